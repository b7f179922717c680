//! Folio Theme System
//!
//! Light/dark theming with a persisted preference that falls back to the
//! operating system's color scheme.
//!
//! # Overview
//!
//! - **Color scheme**: [`ColorScheme`] is the two-valued theme setting
//! - **Preference**: [`ThemePreference`] reads and writes the persisted choice
//!   through a [`PreferenceStore`]; an absent value defers to the system
//! - **System detection**: [`SystemSchemeSource`] reports the OS hint
//! - **Palette tokens**: [`Palette`] holds the semantic colors for a scheme
//! - **State**: [`ThemeState`] is the explicit context object views read from
//!
//! # Quick Start
//!
//! ```rust
//! use folio_theme::{ColorScheme, FixedSchemeSource, MemoryStore, ThemePreference, ThemeState};
//!
//! let preference = ThemePreference::new(MemoryStore::new());
//! let mut theme = ThemeState::init(preference, &FixedSchemeSource::new(Some(ColorScheme::Dark)));
//! assert_eq!(theme.root_class(), "theme-dark");
//!
//! theme.toggle();
//! assert_eq!(theme.scheme(), ColorScheme::Light);
//! ```

pub mod error;
pub mod platform;
pub mod preference;
pub mod state;
pub mod theme;
pub mod tokens;

pub use error::{Result, ThemeError};
pub use platform::{detect_system_color_scheme, EnvSchemeSource, FixedSchemeSource, SystemSchemeSource};
pub use preference::{FileStore, MemoryStore, PreferenceStore, ThemePreference, THEME_KEY};
pub use state::{SubscriptionId, ThemeState};
pub use theme::ColorScheme;
pub use tokens::*;
