use crate::season::{season_for_date, Palette, Season, SeasonTheme};
use chrono::Datelike;
use tracing::debug;

/// Which season the app is dressed in, and whether that follows the
/// calendar or a manual choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSettings {
    current_season: Season,
    auto_theme: bool,
}

impl ThemeSettings {
    pub fn new<D: Datelike>(today: &D) -> Self {
        ThemeSettings {
            current_season: season_for_date(today),
            auto_theme: true,
        }
    }

    /// Restores saved preferences. A saved season only applies when auto
    /// theme is off.
    pub fn from_preferences<D: Datelike>(
        auto_theme: bool,
        season: Option<Season>,
        today: &D,
    ) -> Self {
        match (auto_theme, season) {
            (false, Some(season)) => ThemeSettings {
                current_season: season,
                auto_theme: false,
            },
            _ => ThemeSettings::new(today),
        }
    }

    pub fn current_season(&self) -> Season {
        self.current_season
    }

    pub fn auto_theme(&self) -> bool {
        self.auto_theme
    }

    pub fn set_season(&mut self, season: Season) {
        debug!(%season, "manual season selected");
        self.current_season = season;
        self.auto_theme = false;
    }

    pub fn set_auto_theme<D: Datelike>(&mut self, enabled: bool, today: &D) {
        self.auto_theme = enabled;
        if enabled {
            self.current_season = season_for_date(today);
        }
    }

    pub fn theme(&self) -> &'static SeasonTheme {
        self.current_season.theme()
    }

    pub fn colors(&self) -> &'static Palette {
        &self.theme().colors
    }
}
