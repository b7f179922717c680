//! System color scheme detection
//!
//! The OS hint is only consulted when no preference has been persisted.
//! Detection is best-effort: an unknown environment reports `None` and the
//! caller falls back to light.

use crate::theme::ColorScheme;

/// Explicit override, `light` or `dark`
pub const SCHEME_ENV_VAR: &str = "FOLIO_COLOR_SCHEME";

/// Source of the operating system's light/dark hint
pub trait SystemSchemeSource {
    /// Current system scheme, `None` when the platform gives no signal
    fn current(&self) -> Option<ColorScheme>;
}

/// Reads the hint from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSchemeSource;

impl SystemSchemeSource for EnvSchemeSource {
    fn current(&self) -> Option<ColorScheme> {
        detect_system_color_scheme()
    }
}

/// A fixed hint, for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSchemeSource(Option<ColorScheme>);

impl FixedSchemeSource {
    pub fn new(scheme: Option<ColorScheme>) -> Self {
        Self(scheme)
    }

    pub fn set(&mut self, scheme: Option<ColorScheme>) {
        self.0 = scheme;
    }
}

impl SystemSchemeSource for FixedSchemeSource {
    fn current(&self) -> Option<ColorScheme> {
        self.0
    }
}

/// Detect the system color scheme from the environment
pub fn detect_system_color_scheme() -> Option<ColorScheme> {
    scheme_from_env(|key| std::env::var(key).ok())
}

/// `FOLIO_COLOR_SCHEME` wins; otherwise a GTK theme name ending in `:dark`
/// or `-dark` counts as dark, any other GTK theme as light.
fn scheme_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<ColorScheme> {
    if let Some(value) = lookup(SCHEME_ENV_VAR) {
        match value.parse() {
            Ok(scheme) => return Some(scheme),
            Err(err) => tracing::warn!("ignoring {SCHEME_ENV_VAR}: {err}"),
        }
    }

    let gtk = lookup("GTK_THEME")?;
    let gtk = gtk.to_ascii_lowercase();
    Some(ColorScheme::from_dark(
        gtk.ends_with(":dark") || gtk.ends_with("-dark"),
    ))
}
