//! Catalog error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Track {id} has an invalid length: {text:?}")]
    InvalidLength { id: String, text: String },

    #[error("Duplicate track id: {0}")]
    DuplicateId(String),

    #[error("Track {id} suggests unknown track {suggestion}")]
    UnknownSuggestion { id: String, suggestion: String },

    #[error("Playback speed must be a positive number, got {0}")]
    InvalidSpeed(f64),
}
