//! Preferences file handling

use crate::error::{DiaryError, Result};
use crate::i18n::Language;
use crate::season::Season;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "diary_config.toml";

/// Stream URL for each season's background track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTable {
    pub spring: String,
    pub summer: String,
    pub autumn: String,
    pub winter: String,
}

impl TrackTable {
    pub fn url_for(&self, season: Season) -> &str {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Autumn => &self.autumn,
            Season::Winter => &self.winter,
        }
    }
}

impl Default for TrackTable {
    fn default() -> Self {
        TrackTable {
            spring: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3".to_string(),
            summer: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3".to_string(),
            autumn: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3".to_string(),
            winter: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3".to_string(),
        }
    }
}

/// Where the remote persistence service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub publishable_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub auto_theme: bool,
    /// Manual season, used only when `auto_theme` is off.
    pub season: Option<Season>,
    pub music_enabled: bool,
    pub tracks: TrackTable,
    pub backend: Option<BackendConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            language: Language::En,
            auto_theme: true,
            season: None,
            music_enabled: true,
            tracks: TrackTable::default(),
            backend: None,
        }
    }
}

impl Config {
    /// Loads the config at `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(DiaryError::Io(e)),
        };

        toml::from_str(&contents).map_err(|source| DiaryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Copy of these preferences with one-run command line overrides
    /// applied. `self` stays what gets saved.
    pub fn with_overrides(&self, language: Option<Language>, no_music: bool) -> Config {
        let mut session = self.clone();
        if let Some(language) = language {
            session.language = language;
        }
        if no_music {
            session.music_enabled = false;
        }
        session
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.music_enabled);
        assert!(config.auto_theme);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("diary_config.toml");
        let config = Config {
            language: Language::Fa,
            auto_theme: false,
            season: Some(Season::Autumn),
            music_enabled: false,
            backend: Some(BackendConfig {
                url: "https://example.supabase.co".into(),
                publishable_key: "anon-key".into(),
            }),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn overrides_do_not_reach_the_saved_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diary_config.toml");
        let saved = Config::default();
        saved.save(&path).unwrap();

        let prefs = Config::load(&path).unwrap();
        let session = prefs.with_overrides(Some(Language::Fr), true);
        assert_eq!(session.language, Language::Fr);
        assert!(!session.music_enabled);

        prefs.save(&path).unwrap();
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.language, Language::En);
        assert!(reloaded.music_enabled);
    }

    #[test]
    fn no_overrides_is_a_plain_copy() {
        let prefs = Config {
            language: Language::Es,
            ..Config::default()
        };
        assert_eq!(prefs.with_overrides(None, false), prefs);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diary_config.toml");
        fs::write(&path, "language = \"es\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.language, Language::Es);
        assert_eq!(config.tracks, TrackTable::default());
        assert!(config.backend.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diary_config.toml");
        fs::write(&path, "language = [").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(DiaryError::ConfigParse { .. })
        ));
    }

    #[test]
    fn track_table_maps_each_season() {
        let tracks = TrackTable::default();
        assert!(tracks.url_for(Season::Spring).ends_with("Song-1.mp3"));
        assert!(tracks.url_for(Season::Winter).ends_with("Song-4.mp3"));
    }
}
