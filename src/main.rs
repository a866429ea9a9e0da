mod ui;

use chrono::Local;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use seasonal_diary::audio::{AudioController, HttpStreamBackend};
use seasonal_diary::backend::BackendClient;
use seasonal_diary::config::{Config, DEFAULT_CONFIG_FILE};
use seasonal_diary::i18n::{Language, Translator};
use seasonal_diary::logging::{self, DEFAULT_LOG_FILE};
use seasonal_diary::theme::ThemeSettings;
use seasonal_diary::{AppContext, EntryStore, User};
use std::path::PathBuf;
use tracing::{info, warn};
use ui::{Action, SettingsEvent, UI};

/// A seasonal mood diary for the terminal.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Preferences file
    #[arg(long, env = "DIARY_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Where log output goes
    #[arg(long, env = "DIARY_LOG", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Override the saved language (en, fa, es, fr)
    #[arg(long)]
    language: Option<Language>,

    /// Start without background music
    #[arg(long)]
    no_music: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init(&args.log_file)?;

    let mut prefs = Config::load(&args.config)
        .map_err(|e| eyre!("Failed to load config: {}", e))?;
    let mut config = prefs.with_overrides(args.language, args.no_music);

    if let Some(backend) = &config.backend {
        // Only configured here; entries stay local.
        match BackendClient::new(backend) {
            Ok(client) => info!(url = %client.base_url(), "persistence service configured"),
            Err(e) => warn!(error = %e, "persistence service unavailable"),
        }
    }

    let today = Local::now();
    let user = User::local();
    let mut app = AppContext::builder()
        .store(EntryStore::with_mock_entries(&user))
        .theme(ThemeSettings::from_preferences(
            config.auto_theme,
            config.season,
            &today,
        ))
        .i18n(Translator::new(config.language)?)
        .user(user)
        .build()?;

    let mut audio = AudioController::new(
        Box::new(HttpStreamBackend::new(reqwest::Client::new())),
        config.tracks.clone(),
    );
    audio.initialize().await;
    if config.music_enabled {
        audio.play_seasonal_music(app.theme.current_season()).await;
    }

    info!(language = %config.language, season = %app.theme.current_season(), "diary started");
    let result = run(&mut app, &mut audio, &mut prefs, &mut config, &args).await;

    audio.cleanup().await;
    info!("diary closed");
    result
}

async fn run(
    app: &mut AppContext,
    audio: &mut AudioController,
    prefs: &mut Config,
    config: &mut Config,
    args: &Args,
) -> Result<()> {
    let mut ui = UI::new()?;

    loop {
        ui.display(app)?;

        if let Some(action) = ui.handle_input(app)? {
            match action {
                Action::Write => {
                    if let Some(draft) = ui.get_new_entry(app)? {
                        if let Some(entry) = draft.into_entry(app.user.author()) {
                            app.store.add_entry(entry);
                        }
                    }
                }
                Action::View => {
                    ui.view_entries(app)?;
                }
                Action::Search => {
                    if let Some(query) = ui.get_search_query(app)? {
                        let results = app.store.search_entries(&query);
                        ui.display_search_results(app, &results)?;
                    }
                }
                Action::Profile => {
                    ui.view_profile(app)?;
                }
                Action::Settings => {
                    let events = ui.settings(app, config.music_enabled)?;
                    if events.is_empty() {
                        continue;
                    }
                    apply_settings(app, audio, prefs, config, &events).await;
                    if let Err(e) = prefs.save(&args.config) {
                        warn!(error = %e, "could not save preferences");
                    }
                }
                Action::Quit => break,
            }
        }
    }

    Ok(())
}

/// Applies settings changes to the running session and to `prefs`, which
/// holds only what the user chose and is what gets saved.
async fn apply_settings(
    app: &AppContext,
    audio: &mut AudioController,
    prefs: &mut Config,
    config: &mut Config,
    events: &[SettingsEvent],
) {
    for event in events {
        match *event {
            SettingsEvent::LanguageChanged(language) => {
                prefs.language = language;
                config.language = language;
            }
            SettingsEvent::SeasonChanged(season) => info!(%season, "theme season changed"),
            SettingsEvent::MusicToggled(enabled) => {
                prefs.music_enabled = enabled;
                config.music_enabled = enabled;
            }
        }
    }
    prefs.auto_theme = app.theme.auto_theme();
    prefs.season = (!prefs.auto_theme).then(|| app.theme.current_season());

    let season = app.theme.current_season();
    if !config.music_enabled {
        audio.stop_music().await;
    } else if audio.loaded_season() != Some(season) {
        audio.play_seasonal_music(season).await;
    } else if !audio.is_playing() {
        audio.toggle_music().await;
    }
}
