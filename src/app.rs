use crate::diary_entry::User;
use crate::diary_state::{EntryStore, ProfileStats};
use crate::error::{DiaryError, Result};
use crate::i18n::Translator;
use crate::theme::ThemeSettings;

/// Everything the screens need, wired once at start-up and passed down by
/// reference.
pub struct AppContext {
    pub store: EntryStore,
    pub theme: ThemeSettings,
    pub i18n: Translator,
    pub user: User,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key)
    }

    pub fn profile_stats(&self) -> ProfileStats {
        self.store.profile_stats(&self.user)
    }
}

#[derive(Default)]
pub struct AppContextBuilder {
    store: Option<EntryStore>,
    theme: Option<ThemeSettings>,
    i18n: Option<Translator>,
    user: Option<User>,
}

impl AppContextBuilder {
    pub fn store(mut self, store: EntryStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn theme(mut self, theme: ThemeSettings) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn i18n(mut self, i18n: Translator) -> Self {
        self.i18n = Some(i18n);
        self
    }

    pub fn user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Fails on the first collaborator that was never supplied.
    pub fn build(self) -> Result<AppContext> {
        Ok(AppContext {
            store: self.store.ok_or(DiaryError::MissingProvider("EntryStore"))?,
            theme: self.theme.ok_or(DiaryError::MissingProvider("ThemeSettings"))?,
            i18n: self.i18n.ok_or(DiaryError::MissingProvider("Translator"))?,
            user: self.user.ok_or(DiaryError::MissingProvider("User"))?,
        })
    }
}
