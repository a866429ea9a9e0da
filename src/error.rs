//! Error types for the diary library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiaryError {
    /// A collaborator was never handed to the composition root.
    #[error("{0} was not provided to the application context")]
    MissingProvider(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed {language} catalog: {source}")]
    Catalog {
        language: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DiaryError>;
