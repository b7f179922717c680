//! Folio Application
//!
//! The portfolio page and its runtime:
//!
//! - **Content**: the bundled bio cards, projects, technologies and contacts
//! - **Page**: composition into an element tree with document-space layout
//! - **App**: [`PortfolioApp`], the explicit lifecycle context routing events
//!   to the deck, reveal observer, marquee, glow and theme
//! - **Headless**: JSON scenarios driving the app frame by frame with
//!   structured reports
//!
//! # Example
//!
//! ```rust
//! use folio_app::{Content, FolioConfig, PortfolioApp};
//! use folio_core::Viewport;
//! use folio_theme::{FixedSchemeSource, MemoryStore, ThemePreference};
//!
//! let mut app = PortfolioApp::new(
//!     FolioConfig::default(),
//!     Content::portfolio(),
//!     ThemePreference::new(MemoryStore::new()),
//!     &FixedSchemeSource::default(),
//! )?;
//! app.mount(Viewport::new(1280.0, 720.0));
//! app.settle(16, 5_000);
//!
//! assert!(app.render_html().contains("theme-light"));
//! # Ok::<(), folio_app::FolioError>(())
//! ```

pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod icons;
pub mod page;
pub mod targets;

pub use app::PortfolioApp;
pub use config::FolioConfig;
pub use content::Content;
pub use error::{FolioError, Result};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, HeadlessApp, RunOutcome};
pub use headless_runtime::HeadlessRunConfig;
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use page::{Page, PageLayout, Section};

/// Commonly used imports
pub mod prelude {
    pub use crate::app::PortfolioApp;
    pub use crate::config::FolioConfig;
    pub use crate::content::Content;
    pub use crate::error::{FolioError, Result};
    pub use folio_core::{Event, Viewport};
    pub use folio_theme::{ColorScheme, FileStore, MemoryStore, ThemePreference};
}
