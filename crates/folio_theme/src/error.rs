//! Theme error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by preference stores and scheme parsing
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Reading or writing the preference file failed
    #[error("Preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference file is not valid TOML
    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    /// Preferences could not be serialized
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A scheme name other than "light" or "dark"
    #[error("Unknown color scheme: {0:?}")]
    UnknownScheme(String),
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
