//! Error types for folio_app

use folio_theme::ThemeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or mounting the app
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid viewport {width}x{height}: dimensions must be positive")]
    InvalidViewport { width: f32, height: f32 },
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, FolioError>;
