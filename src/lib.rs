//! Seasonal diary: an in-memory journal of mood-tagged entries with likes and
//! comments, seasonal themes, localized strings, and seasonal background
//! music.

pub mod app;
pub mod audio;
pub mod backend;
pub mod composer;
pub mod config;
pub mod diary_entry;
pub mod diary_state;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod season;
pub mod theme;

pub use app::AppContext;
pub use diary_entry::{AuthorSnapshot, Comment, DiaryEntry, Mood, User};
pub use diary_state::{EntryStore, ProfileStats, Snapshot};
pub use error::{DiaryError, Result};
pub use season::Season;
