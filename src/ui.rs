use chrono::{DateTime, Local};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use seasonal_diary::composer::{submit_comment, EntryDraft};
use seasonal_diary::i18n::Language;
use seasonal_diary::season::{Palette, Rgb, Season};
use seasonal_diary::{AppContext, DiaryEntry};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub enum Action {
    Write,
    View,
    Search,
    Profile,
    Settings,
    Quit,
}

/// Something the settings screen changed that the caller has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    LanguageChanged(Language),
    SeasonChanged(Season),
    MusicToggled(bool),
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn base_style(palette: &Palette) -> Style {
    Style::default()
        .fg(color(palette.text))
        .bg(color(palette.background))
}

fn titled_block<'a>(title: String, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.primary)))
        .title(title)
}

fn screen_chunks(area: Rect, body_min: u16) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(body_min),
            Constraint::Length(3),
        ])
        .split(area)
}

fn render_header(f: &mut Frame, area: Rect, text: String, palette: &Palette) {
    let title = Paragraph::new(text)
        .style(
            Style::default()
                .fg(color(palette.primary))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn render_footer(f: &mut Frame, area: Rect, text: String, palette: &Palette) {
    let instructions = Paragraph::new(text)
        .style(Style::default().fg(color(palette.secondary)))
        .alignment(Alignment::Center);
    f.render_widget(instructions, area);
}

fn text_alignment(language: Language) -> Alignment {
    if language.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

pub fn format_date(date: &DateTime<Local>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Cuts `text` so it fits in `width` terminal columns.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// One-line list label for an entry.
pub fn entry_summary(entry: &DiaryEntry, width: usize) -> String {
    let line = format!(
        "{} {} · {} · ♥ {} · 💬 {}",
        entry.mood.emoji(),
        entry.title.lines().next().unwrap_or(""),
        format_date(&entry.date),
        entry.likes,
        entry.comment_count()
    );
    truncate_to_width(&line, width)
}

/// Single-field text editor with a char-based cursor.
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let i = self.byte_index();
        self.value.insert(i, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let i = self.byte_index();
            self.value.remove(i);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let i = self.byte_index();
            self.value.remove(i);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn rendered(&self, show_cursor: bool) -> String {
        let mut shown = self.value.clone();
        if show_cursor {
            shown.insert(self.byte_index(), '|');
        }
        shown
    }

    /// Applies an editing key. Returns false for keys it does not handle.
    pub fn handle_key(&mut self, key: KeyEvent, multiline: bool) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(c),
            KeyCode::Enter if multiline => self.insert('\n'),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DraftField {
    Title,
    Mood,
    Content,
}

impl DraftField {
    fn next(self) -> Self {
        match self {
            DraftField::Title => DraftField::Mood,
            DraftField::Mood => DraftField::Content,
            DraftField::Content => DraftField::Title,
        }
    }
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    fn blink(&mut self) {
        if self.last_cursor_update.elapsed() >= Duration::from_millis(500) {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_update = Instant::now();
        }
    }

    pub fn display(&mut self, app: &AppContext) -> Result<()> {
        let palette = *app.theme.colors();
        let emoji = app.theme.theme().emoji;
        let season = app.t(app.theme.current_season().name());
        let header = format!("{} · {} {}", app.t("diary"), emoji, season);
        let snapshot = app.store.snapshot();
        let controls = if snapshot.is_empty() {
            format!(
                "w: {}  p: {}  s: {}  q: {}",
                app.t("newEntry"),
                app.t("profile"),
                app.t("settings"),
                app.t("quit")
            )
        } else {
            format!(
                "w: {}  v: {}  /: {}  p: {}  s: {}  q: {}",
                app.t("newEntry"),
                app.t("view"),
                app.t("search"),
                app.t("profile"),
                app.t("settings"),
                app.t("quit")
            )
        };
        let empty_lines = vec![
            Line::from("📝"),
            Line::from(Span::styled(
                app.t("noEntries"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(app.t("welcomeMessage")),
        ];
        let entries_title = app.t("entries");

        self.terminal.draw(|f| {
            f.render_widget(Block::default().style(base_style(&palette)), f.area());
            let chunks = screen_chunks(f.area(), 0);
            render_header(f, chunks[0], header, &palette);

            let block = titled_block(entries_title, &palette);
            if snapshot.is_empty() {
                let empty = Paragraph::new(empty_lines)
                    .block(block)
                    .alignment(Alignment::Center);
                f.render_widget(empty, chunks[1]);
            } else {
                let width = chunks[1].width.saturating_sub(2) as usize;
                let items: Vec<ListItem> = snapshot
                    .iter()
                    .map(|entry| ListItem::new(entry_summary(entry, width)))
                    .collect();
                f.render_widget(List::new(items).block(block), chunks[1]);
            }

            render_footer(f, chunks[2], controls, &palette);
        })?;

        Ok(())
    }

    pub fn handle_input(&self, app: &AppContext) -> Result<Option<Action>> {
        if let Event::Key(key) = event::read()? {
            let has_entries = !app.store.is_empty();
            match key.code {
                KeyCode::Char('w') => Ok(Some(Action::Write)),
                KeyCode::Char('p') => Ok(Some(Action::Profile)),
                KeyCode::Char('s') => Ok(Some(Action::Settings)),
                KeyCode::Char('q') => Ok(Some(Action::Quit)),
                KeyCode::Char('v') if has_entries => Ok(Some(Action::View)),
                KeyCode::Char('/') if has_entries => Ok(Some(Action::Search)),
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// New-entry form. `None` when the user cancels.
    pub fn get_new_entry(&mut self, app: &AppContext) -> Result<Option<EntryDraft>> {
        let palette = *app.theme.colors();
        let align = text_alignment(app.i18n.language());
        let mut title = TextInput::default();
        let mut content = TextInput::default();
        let mut draft = EntryDraft::default();
        let mut field = DraftField::Title;

        let header = app.t("newEntry");
        let title_label = app.t("title");
        let mood_label = app.t("mood");
        let content_label = app.t("writeYourThoughts");
        let footer = format!(
            "Tab: ↹  ←/→: {}  Ctrl+S: {}  Esc: {}",
            app.t("mood"),
            app.t("save"),
            app.t("cancel")
        );

        loop {
            self.blink();
            let show_cursor = self.cursor_visible;
            let title_text = title.rendered(show_cursor && field == DraftField::Title);
            let content_text = content.rendered(show_cursor && field == DraftField::Content);
            let mood_line = Line::from(
                seasonal_diary::Mood::ALL
                    .iter()
                    .map(|m| {
                        let style = if *m == draft.mood {
                            Style::default()
                                .bg(color(palette.primary))
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        Span::styled(format!(" {} ", m.emoji()), style)
                    })
                    .collect::<Vec<_>>(),
            );
            let highlight = |active: bool| {
                if active {
                    Style::default().fg(color(palette.accent))
                } else {
                    Style::default().fg(color(palette.primary))
                }
            };

            self.terminal.draw(|f| {
                f.render_widget(Block::default().style(base_style(&palette)), f.area());
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(6),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                render_header(f, chunks[0], header.clone(), &palette);

                let title_input = Paragraph::new(title_text).alignment(align).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(highlight(field == DraftField::Title))
                        .title(title_label.clone()),
                );
                f.render_widget(title_input, chunks[1]);

                let moods = Paragraph::new(mood_line).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(highlight(field == DraftField::Mood))
                        .title(mood_label.clone()),
                );
                f.render_widget(moods, chunks[2]);

                let content_input = Paragraph::new(content_text)
                    .alignment(align)
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(highlight(field == DraftField::Content))
                            .title(content_label.clone()),
                    );
                f.render_widget(content_input, chunks[3]);

                render_footer(f, chunks[4], footer.clone(), &palette);
            })?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    draft.title = title.value().to_string();
                    draft.content = content.value().to_string();
                    if draft.is_submittable() {
                        return Ok(Some(draft));
                    }
                    debug!("draft is missing a title or content");
                }
                KeyCode::Tab => field = field.next(),
                KeyCode::Left if field == DraftField::Mood => draft.mood = draft.mood.prev(),
                KeyCode::Right if field == DraftField::Mood => draft.mood = draft.mood.next(),
                _ => {
                    match field {
                        DraftField::Title => title.handle_key(key, false),
                        DraftField::Content => content.handle_key(key, true),
                        DraftField::Mood => false,
                    };
                }
            }
        }
    }

    /// Browses entries and applies like, comment, and delete to the store.
    pub fn view_entries(&mut self, app: &AppContext) -> Result<()> {
        let palette = *app.theme.colors();
        let mut selected_index = 0;
        let list_title = app.t("entries");
        let footer = format!(
            "↑/↓  Enter: {}  l: {}  c: {}  d: {}  Esc: {}",
            app.t("view"),
            app.t("like"),
            app.t("addComment"),
            app.t("delete"),
            app.t("back")
        );

        loop {
            let entries = app.store.snapshot();
            if entries.is_empty() {
                return Ok(());
            }
            selected_index = selected_index.min(entries.len() - 1);

            let header = app.t("diary");
            self.terminal.draw(|f| {
                f.render_widget(Block::default().style(base_style(&palette)), f.area());
                let chunks = screen_chunks(f.area(), 10);
                render_header(f, chunks[0], header, &palette);

                let width = chunks[1].width.saturating_sub(4) as usize;
                let items: Vec<ListItem> = entries
                    .iter()
                    .map(|e| ListItem::new(entry_summary(e, width)))
                    .collect();
                let entries_list = List::new(items)
                    .block(titled_block(list_title.clone(), &palette))
                    .highlight_style(
                        Style::default()
                            .fg(color(palette.accent))
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    entries_list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                render_footer(f, chunks[2], footer.clone(), &palette);
            })?;

            if let Event::Key(key) = event::read()? {
                let id = entries[selected_index].id.clone();
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < entries.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter => self.view_full_entry(app, &id)?,
                    KeyCode::Char('l') => app.store.like_entry(&id),
                    KeyCode::Char('c') => {
                        if let Some(text) = self.prompt_line(app, app.t("addComment"))? {
                            submit_comment(&app.store, &id, &text);
                        }
                    }
                    KeyCode::Char('d') => {
                        if self.confirm(app, &entries[selected_index])? {
                            app.store.delete_entry(&id);
                        }
                    }
                    KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn view_full_entry(&mut self, app: &AppContext, id: &str) -> Result<()> {
        let palette = *app.theme.colors();
        let align = text_alignment(app.i18n.language());
        let comments_title = app.t("comments");
        let footer = format!(
            "l: {}  c: {}  Esc: {}",
            app.t("like"),
            app.t("addComment"),
            app.t("back")
        );

        loop {
            // The entry may have been deleted elsewhere; leave quietly.
            let Some(entry) = app.store.get(id) else {
                return Ok(());
            };

            let header = format!("{} {}", entry.mood.emoji(), entry.title);
            let mut body = vec![
                Line::from(Span::styled(
                    format!(
                        "{} {} · {}",
                        entry.author.avatar,
                        entry.author.name,
                        format_date(&entry.date)
                    ),
                    Style::default().fg(color(palette.secondary)),
                )),
                Line::from(""),
            ];
            body.extend(entry.content.lines().map(|l| Line::from(l.to_string())));
            body.push(Line::from(""));
            body.push(Line::from(format!(
                "♥ {} {}   💬 {} {}",
                entry.likes,
                app.t("likes"),
                entry.comment_count(),
                app.t("comments")
            )));

            let comments: Vec<ListItem> = entry
                .comments
                .iter()
                .map(|c| {
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            format!(
                                "{} {} · {}",
                                c.author.avatar,
                                c.author.name,
                                format_date(&c.date)
                            ),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(c.content.clone()),
                    ])
                })
                .collect();

            self.terminal.draw(|f| {
                f.render_widget(Block::default().style(base_style(&palette)), f.area());
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(8),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                render_header(f, chunks[0], header, &palette);
                let content = Paragraph::new(Text::from(body))
                    .alignment(align)
                    .wrap(Wrap { trim: false })
                    .block(titled_block(String::new(), &palette));
                f.render_widget(content, chunks[1]);
                f.render_widget(
                    List::new(comments).block(titled_block(comments_title.clone(), &palette)),
                    chunks[2],
                );
                render_footer(f, chunks[3], footer.clone(), &palette);
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('l') => app.store.like_entry(id),
                    KeyCode::Char('c') => {
                        if let Some(text) = self.prompt_line(app, app.t("addComment"))? {
                            submit_comment(&app.store, id, &text);
                        }
                    }
                    KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn confirm(&mut self, app: &AppContext, entry: &DiaryEntry) -> Result<bool> {
        let palette = *app.theme.colors();
        let question = format!("{} \"{}\"? (y/n)", app.t("delete"), entry.title);

        self.terminal.draw(|f| {
            f.render_widget(Block::default().style(base_style(&palette)), f.area());
            let chunks = screen_chunks(f.area(), 3);
            let prompt = Paragraph::new(question)
                .alignment(Alignment::Center)
                .block(titled_block(String::new(), &palette));
            f.render_widget(prompt, chunks[1]);
        })?;

        loop {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    }

    /// One line of free text. Enter submits, Esc cancels.
    fn prompt_line(&mut self, app: &AppContext, title: String) -> Result<Option<String>> {
        let palette = *app.theme.colors();
        let align = text_alignment(app.i18n.language());
        let mut input = TextInput::default();
        let footer = format!("Enter: {}  Esc: {}", app.t("save"), app.t("cancel"));

        loop {
            self.blink();
            let shown = input.rendered(self.cursor_visible);
            self.terminal.draw(|f| {
                f.render_widget(Block::default().style(base_style(&palette)), f.area());
                let chunks = screen_chunks(f.area(), 3);
                let field = Paragraph::new(shown)
                    .alignment(align)
                    .block(titled_block(title.clone(), &palette));
                f.render_widget(field, chunks[1]);
                render_footer(f, chunks[2], footer.clone(), &palette);
            })?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Enter => return Ok(Some(input.value().to_string())),
                    KeyCode::Esc => return Ok(None),
                    _ => {
                        input.handle_key(key, false);
                    }
                }
            }
        }
    }

    pub fn get_search_query(&mut self, app: &AppContext) -> Result<Option<String>> {
        self.prompt_line(app, app.t("search"))
    }

    pub fn display_search_results(
        &mut self,
        app: &AppContext,
        results: &[DiaryEntry],
    ) -> Result<()> {
        let palette = *app.theme.colors();
        let header = format!("{} ({})", app.t("search"), results.len());
        let footer = format!("Esc: {}", app.t("back"));
        let list_title = app.t("entries");

        self.terminal.draw(|f| {
            f.render_widget(Block::default().style(base_style(&palette)), f.area());
            let chunks = screen_chunks(f.area(), 10);
            render_header(f, chunks[0], header, &palette);
            let width = chunks[1].width.saturating_sub(2) as usize;
            let items: Vec<ListItem> = results
                .iter()
                .map(|e| ListItem::new(entry_summary(e, width)))
                .collect();
            f.render_widget(
                List::new(items).block(titled_block(list_title, &palette)),
                chunks[1],
            );
            render_footer(f, chunks[2], footer, &palette);
        })?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Esc {
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn view_profile(&mut self, app: &AppContext) -> Result<()> {
        let palette = *app.theme.colors();
        let align = text_alignment(app.i18n.language());
        let stats = app.profile_stats();
        let user = &app.user;
        let header = app.t("profile");
        let footer = format!("Esc: {}", app.t("back"));

        let card = vec![
            Line::from(user.avatar.clone()),
            Line::from(Span::styled(
                user.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                user.bio.clone(),
                Style::default().fg(color(palette.secondary)),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    stats.entries.to_string(),
                    Style::default().fg(color(palette.primary)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}   ", app.t("entries"))),
                Span::styled(
                    stats.followers.to_string(),
                    Style::default().fg(color(palette.primary)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}   ", app.t("followers"))),
                Span::styled(
                    stats.following.to_string(),
                    Style::default().fg(color(palette.primary)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}", app.t("following"))),
            ]),
            Line::from(format!(
                "♥ {} {}   💬 {} {}",
                stats.total_likes,
                app.t("likes"),
                stats.total_comments,
                app.t("comments")
            )),
        ];

        let snapshot = app.store.snapshot();
        let mine: Vec<DiaryEntry> = user.entries(&snapshot).cloned().collect();
        let entries_title = app.t("entries");

        self.terminal.draw(|f| {
            f.render_widget(Block::default().style(base_style(&palette)), f.area());
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(8),
                    Constraint::Min(4),
                    Constraint::Length(3),
                ])
                .split(f.area());

            render_header(f, chunks[0], header, &palette);
            f.render_widget(
                Paragraph::new(card)
                    .alignment(Alignment::Center)
                    .block(titled_block(String::new(), &palette)),
                chunks[1],
            );
            let width = chunks[2].width.saturating_sub(2) as usize;
            let items: Vec<ListItem> = mine
                .iter()
                .map(|e| ListItem::new(Line::from(entry_summary(e, width)).alignment(align)))
                .collect();
            f.render_widget(
                List::new(items).block(titled_block(entries_title, &palette)),
                chunks[2],
            );
            render_footer(f, chunks[3], footer, &palette);
        })?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Esc {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Language, theme, and music preferences. Theme and language changes
    /// are applied to `app` directly; the returned events tell the caller
    /// what else to react to.
    pub fn settings(
        &mut self,
        app: &mut AppContext,
        music_enabled: bool,
    ) -> Result<Vec<SettingsEvent>> {
        let mut events = Vec::new();
        let mut music_enabled = music_enabled;
        let mut row = 0usize;
        const ROWS: usize = 4;

        loop {
            let palette = *app.theme.colors();
            let header = app.t("settings");
            let footer = format!("↑/↓  ←/→  Space  Esc: {}", app.t("back"));
            let language = app.i18n.language();
            let season = app.theme.current_season();

            let languages = Language::ALL
                .iter()
                .map(|l| {
                    if *l == language {
                        format!("[{}]", l.native_name())
                    } else {
                        l.native_name().to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            let seasons = Season::ALL
                .iter()
                .map(|s| {
                    let label = format!("{} {}", s.theme().emoji, app.t(s.name()));
                    if *s == season {
                        format!("[{label}]")
                    } else {
                        label
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            let check = |on: bool| if on { "[x]" } else { "[ ]" };
            let lines = [
                format!("{}: {}", app.t("language"), languages),
                format!("{} {}", check(app.theme.auto_theme()), app.t("autoTheme")),
                format!("{}: {}", app.t("theme"), seasons),
                format!(
                    "{} {} ({})",
                    check(music_enabled),
                    app.t("music"),
                    if music_enabled { app.t("musicOn") } else { app.t("musicOff") }
                ),
            ];

            self.terminal.draw(|f| {
                f.render_widget(Block::default().style(base_style(&palette)), f.area());
                let chunks = screen_chunks(f.area(), 6);
                render_header(f, chunks[0], header.clone(), &palette);
                let items: Vec<ListItem> = lines.iter().map(|l| ListItem::new(l.clone())).collect();
                let list = List::new(items)
                    .block(titled_block(header, &palette))
                    .highlight_style(
                        Style::default()
                            .fg(color(palette.accent))
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(row)),
                );
                render_footer(f, chunks[2], footer, &palette);
            })?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            let forward = match key.code {
                KeyCode::Esc => break,
                KeyCode::Up => {
                    row = row.saturating_sub(1);
                    continue;
                }
                KeyCode::Down => {
                    row = (row + 1).min(ROWS - 1);
                    continue;
                }
                KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => true,
                KeyCode::Left => false,
                _ => continue,
            };

            let today = Local::now();
            match row {
                0 => {
                    let next = cycle(&Language::ALL, language, forward);
                    app.i18n.set_language(next);
                    events.push(SettingsEvent::LanguageChanged(next));
                }
                1 => {
                    app.theme.set_auto_theme(!app.theme.auto_theme(), &today);
                    if app.theme.current_season() != season {
                        events.push(SettingsEvent::SeasonChanged(app.theme.current_season()));
                    }
                }
                2 => {
                    let next = cycle(&Season::ALL, season, forward);
                    app.theme.set_season(next);
                    events.push(SettingsEvent::SeasonChanged(next));
                }
                _ => {
                    music_enabled = !music_enabled;
                    events.push(SettingsEvent::MusicToggled(music_enabled));
                }
            }
        }

        Ok(events)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let pos = all.iter().position(|x| *x == current).unwrap_or(0);
    if forward {
        all[(pos + 1) % len]
    } else {
        all[(pos + len - 1) % len]
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
