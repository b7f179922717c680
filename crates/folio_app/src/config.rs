//! `folio.toml` configuration
//!
//! ```toml
//! [site]
//! title = "Gia Huy Phan | Portfolio"
//!
//! [viewport]
//! width = 1440
//! height = 900
//!
//! [deck]
//! mode = "scroll-linked"
//! seed = 7
//!
//! [storage]
//! preferences = "prefs.toml"
//! ```
//!
//! Every section and key is optional.

use crate::error::{FolioError, Result};
use folio_core::Viewport;
use folio_layout::DeckConfig;
use folio_theme::FileStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub site: SiteConfig,
    pub viewport: ViewportConfig,
    pub deck: DeckConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    /// Logo image source
    pub logo: String,
    /// Footer year; the current year when unset
    pub year: Option<i32>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Gia Huy Phan | Portfolio".to_string(),
            logo: "assets/logo.png".to_string(),
            year: None,
        }
    }
}

/// Logical viewport used for layout and headless runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Preference file; the platform config dir when unset
    pub preferences: Option<PathBuf>,
}

impl FolioConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| FolioError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validated viewport
    pub fn viewport(&self) -> Result<Viewport> {
        let ViewportConfig { width, height } = self.viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(FolioError::InvalidViewport { width, height });
        }
        Ok(Viewport::new(width, height))
    }

    /// Where the theme preference is persisted
    pub fn preference_path(&self) -> Option<PathBuf> {
        self.storage
            .preferences
            .clone()
            .or_else(FileStore::default_location)
    }
}
