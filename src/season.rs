use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    pub fn theme(self) -> &'static SeasonTheme {
        match self {
            Season::Spring => &SPRING,
            Season::Summer => &SUMMER,
            Season::Autumn => &AUTUMN,
            Season::Winter => &WINTER,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a zero-based month (0 = January) to its season.
pub fn season_for_month(month0: u32) -> Season {
    match month0 {
        2..=4 => Season::Spring,
        5..=7 => Season::Summer,
        8..=10 => Season::Autumn,
        _ => Season::Winter,
    }
}

pub fn season_for_date<D: Datelike>(date: &D) -> Season {
    season_for_month(date.month0())
}

pub fn current_season() -> Season {
    season_for_date(&Local::now())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub background: Rgb,
    pub text: Rgb,
    pub card: Rgb,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SeasonTheme {
    pub season: Season,
    pub colors: Palette,
    /// Key into the configured track table.
    pub music_track: &'static str,
    pub emoji: &'static str,
}

const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

static SPRING: SeasonTheme = SeasonTheme {
    season: Season::Spring,
    colors: Palette {
        primary: Rgb(0xA0, 0xD6, 0xB4),
        secondary: Rgb(0xB4, 0xD6, 0xA0),
        accent: Rgb(0xD6, 0xC4, 0xA0),
        background: Rgb(0xF8, 0xFF, 0xF8),
        text: Rgb(0x2D, 0x5A, 0x3D),
        card: WHITE,
    },
    music_track: "spring",
    emoji: "🌸",
};

static SUMMER: SeasonTheme = SeasonTheme {
    season: Season::Summer,
    colors: Palette {
        primary: Rgb(0xFF, 0xD7, 0x00),
        secondary: Rgb(0xFF, 0xA5, 0x00),
        accent: Rgb(0xFF, 0x6B, 0x6B),
        background: Rgb(0xFF, 0xFE, 0xF0),
        text: Rgb(0x8B, 0x45, 0x13),
        card: WHITE,
    },
    music_track: "summer",
    emoji: "☀️",
};

static AUTUMN: SeasonTheme = SeasonTheme {
    season: Season::Autumn,
    colors: Palette {
        primary: Rgb(0xD2, 0x69, 0x1E),
        secondary: Rgb(0xCD, 0x85, 0x3F),
        accent: Rgb(0xFF, 0x8C, 0x00),
        background: Rgb(0xFF, 0xF8, 0xF0),
        text: Rgb(0x65, 0x43, 0x21),
        card: WHITE,
    },
    music_track: "autumn",
    emoji: "🍂",
};

static WINTER: SeasonTheme = SeasonTheme {
    season: Season::Winter,
    colors: Palette {
        primary: Rgb(0xB0, 0xE0, 0xE6),
        secondary: Rgb(0x87, 0xCE, 0xEB),
        accent: Rgb(0x4A, 0x90, 0xE2),
        background: Rgb(0xF0, 0xF8, 0xFF),
        text: Rgb(0x1C, 0x3A, 0x47),
        card: WHITE,
    },
    music_track: "winter",
    emoji: "❄️",
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn months_map_to_seasons() {
        assert_eq!(season_for_month(0), Season::Winter);
        assert_eq!(season_for_month(3), Season::Spring);
        assert_eq!(season_for_month(6), Season::Summer);
        assert_eq!(season_for_month(9), Season::Autumn);
        assert_eq!(season_for_month(11), Season::Winter);
    }

    #[test]
    fn boundaries() {
        assert_eq!(season_for_month(1), Season::Winter);
        assert_eq!(season_for_month(2), Season::Spring);
        assert_eq!(season_for_month(4), Season::Spring);
        assert_eq!(season_for_month(5), Season::Summer);
        assert_eq!(season_for_month(7), Season::Summer);
        assert_eq!(season_for_month(8), Season::Autumn);
        assert_eq!(season_for_month(10), Season::Autumn);
    }

    #[test]
    fn date_uses_zero_based_month() {
        let july = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(season_for_date(&july), Season::Summer);
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(season_for_date(&march), Season::Spring);
    }

    #[test]
    fn themes_match_their_season() {
        for season in Season::ALL {
            let theme = season.theme();
            assert_eq!(theme.season, season);
            assert_eq!(theme.music_track, season.name());
        }
        assert_eq!(Season::Autumn.theme().colors.primary.hex(), "#D2691E");
        assert_eq!(Season::Winter.theme().emoji, "❄️");
    }

    #[test]
    fn season_serializes_lowercase() {
        let s = serde_json::to_string(&Season::Autumn).unwrap();
        assert_eq!(s, "\"autumn\"");
    }
}
