use crate::error::{DiaryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
    Es,
    Fr,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Fa, Language::Es, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fa => "fa",
            Language::Es => "es",
            Language::Fr => "fr",
        }
    }

    /// Name of the language written in itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fa => "فارسی",
            Language::Es => "Español",
            Language::Fr => "Français",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Fa)
    }

    fn catalog_source(self) -> &'static str {
        match self {
            Language::En => include_str!("../locales/en.json"),
            Language::Fa => include_str!("../locales/fa.json"),
            Language::Es => include_str!("../locales/es.json"),
            Language::Fr => include_str!("../locales/fr.json"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiaryError::InvalidConfig(format!("unsupported language '{s}'")))
    }
}

type Catalog = HashMap<String, String>;

/// String lookup over the embedded catalogs.
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    catalogs: HashMap<Language, Catalog>,
}

impl Translator {
    pub fn new(language: Language) -> Result<Self> {
        let mut catalogs = HashMap::new();
        for lang in Language::ALL {
            let catalog: Catalog =
                serde_json::from_str(lang.catalog_source()).map_err(|source| DiaryError::Catalog {
                    language: lang.code(),
                    source,
                })?;
            catalogs.insert(lang, catalog);
        }
        Ok(Translator { language, catalogs })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        debug!(%language, "switching language");
        self.language = language;
    }

    /// Looks `key` up in the current language, then English; an unknown key
    /// comes back as itself.
    pub fn t(&self, key: &str) -> String {
        [self.language, Language::En]
            .iter()
            .find_map(|lang| self.catalogs.get(lang).and_then(|c| c.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
