//! Persisted theme preference
//!
//! The preference is a single key in a small key-value store. An absent
//! value is meaningful: it means "follow the system". A store that cannot be
//! read is treated the same as an absent value.

use crate::error::{Result, ThemeError};
use crate::platform::SystemSchemeSource;
use crate::theme::ColorScheme;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key under which the scheme is persisted
pub const THEME_KEY: &str = "theme";

/// Durable key-value storage for preferences
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `key = value`
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Flat TOML file of string values
///
/// A missing file reads as empty. Parent directories are created on the
/// first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/folio/preferences.toml`, if the platform has a config dir
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(ThemeError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(toml::from_str(&text)?)
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let io_err = |source| ThemeError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = toml::to_string(values)?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).store(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// The theme setting on top of a [`PreferenceStore`]
#[derive(Debug, Clone)]
pub struct ThemePreference<S> {
    store: S,
}

impl<S: PreferenceStore> ThemePreference<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The persisted scheme. Read failures and unknown values count as absent.
    pub fn persisted(&self) -> Option<ColorScheme> {
        let raw = match self.store.load(THEME_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!("theme preference unreadable, following system: {err}");
                return None;
            }
        };
        match raw.parse() {
            Ok(scheme) => Some(scheme),
            Err(err) => {
                tracing::warn!("ignoring persisted theme: {err}");
                None
            }
        }
    }

    pub fn has_persisted(&self) -> bool {
        self.persisted().is_some()
    }

    /// Persisted value, else the system hint, else light
    pub fn initial(&self, system: &dyn SystemSchemeSource) -> ColorScheme {
        self.persisted()
            .or_else(|| system.current())
            .unwrap_or_default()
    }

    /// Persist `scheme`. A failed write is logged and otherwise ignored.
    pub fn set(&mut self, scheme: ColorScheme) {
        if let Err(err) = self.store.store(THEME_KEY, scheme.as_str()) {
            tracing::warn!("failed to persist theme {scheme}: {err}");
        } else {
            tracing::debug!(%scheme, "theme preference persisted");
        }
    }

    /// Forget the persisted value so the system hint applies again
    pub fn clear(&mut self) {
        if let Err(err) = self.store.remove(THEME_KEY) {
            tracing::warn!("failed to clear theme preference: {err}");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
