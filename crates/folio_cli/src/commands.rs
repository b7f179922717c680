//! Subcommand implementations

use anyhow::{bail, Context, Result};
use folio_app::{
    run_loaded_scenario, Content, FolioConfig, HeadlessRunConfig, HeadlessScenario, PortfolioApp,
};
use folio_core::Viewport;
use folio_theme::{
    ColorScheme, EnvSchemeSource, FileStore, FixedSchemeSource, MemoryStore, PreferenceStore,
    SystemSchemeSource, ThemePreference, ThemeState, THEME_KEY,
};
use std::io::Write;
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG: &str = "folio.toml";

/// Upper bound on how long `render` waits for animations to settle
const SETTLE_LIMIT_MS: u64 = 10_000;

const FRAME_MS: u64 = 16;

pub fn load_config(path: Option<&Path>) -> Result<FolioConfig> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
        None => {
            tracing::debug!("no {DEFAULT_CONFIG}, using defaults");
            return Ok(FolioConfig::default());
        }
    };
    let config = FolioConfig::load(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn preference_store(config: &FolioConfig) -> Result<FileStore> {
    config
        .preference_path()
        .map(FileStore::new)
        .context("no preference location; set [storage] preferences in folio.toml")
}

/// Render the settled page. `theme` forces a scheme without touching the
/// stored preference.
pub fn render(config: &FolioConfig, out: Option<&Path>, theme: Option<&str>) -> Result<()> {
    let viewport = config.viewport()?;
    let html = match theme {
        Some(raw) => {
            let scheme: ColorScheme = raw.parse()?;
            let preference = ThemePreference::new(MemoryStore::with_value(THEME_KEY, scheme.as_str()));
            render_html(config, preference, &FixedSchemeSource::new(Some(scheme)), viewport)?
        }
        None => {
            let preference = ThemePreference::new(preference_store(config)?);
            render_html(config, preference, &EnvSchemeSource, viewport)?
        }
    };

    match out {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = html.len(), "page rendered");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .context("failed to write page to stdout")?;
        }
    }
    Ok(())
}

fn render_html<S: PreferenceStore>(
    config: &FolioConfig,
    preference: ThemePreference<S>,
    system: &dyn SystemSchemeSource,
    viewport: Viewport,
) -> Result<String> {
    let mut app = PortfolioApp::new(config.clone(), Content::portfolio(), preference, system)?
        .with_theme_transitions(false);
    app.mount(viewport);
    let spent_ms = app.settle(FRAME_MS, SETTLE_LIMIT_MS);
    tracing::debug!(spent_ms, scheme = %app.scheme(), "page settled");
    Ok(app.render_html())
}

/// Run a scenario file, print its report and return whether it passed.
/// Runs are isolated from the stored preference and the system scheme, and
/// the deck is seeded for repeatable rotations.
pub fn scenario(mut config: FolioConfig, file: &Path, report_path: Option<&Path>) -> Result<bool> {
    let scenario = HeadlessScenario::from_path(file)?;
    if config.deck.seed.is_none() {
        config.deck.seed = Some(0);
    }
    let base = HeadlessRunConfig {
        width: config.viewport.width.round().max(0.0) as u32,
        height: config.viewport.height.round().max(0.0) as u32,
        tick_ms: FRAME_MS,
        ..HeadlessRunConfig::default()
    };

    let mut app = PortfolioApp::new(
        config,
        Content::portfolio(),
        ThemePreference::new(MemoryStore::new()),
        &FixedSchemeSource::new(None),
    )?;
    let report = run_loaded_scenario(&scenario, base, &mut app)
        .with_context(|| format!("scenario {} aborted", file.display()))?
        .into_report();

    let mut stdout = std::io::stdout().lock();
    report.write_to_writer(&mut stdout)?;
    if let Some(path) = report_path {
        report.write_to_path(path)?;
    }

    if report.is_passed() {
        tracing::info!(steps = report.steps_run, frames = report.elapsed_frames, "scenario passed");
    } else {
        tracing::warn!(
            step = ?report.failed_step_index,
            code = ?report.code,
            "scenario failed"
        );
    }
    Ok(report.is_passed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeCommand {
    Get,
    Set(ColorScheme),
    Toggle,
    Clear,
}

/// Apply a theme command against the configured preference file and
/// describe the outcome
pub fn theme(config: &FolioConfig, command: ThemeCommand) -> Result<String> {
    let store = preference_store(config)?;
    let path = store.path().to_path_buf();
    theme_with(ThemePreference::new(store), &EnvSchemeSource, command)
        .with_context(|| format!("preference file {}", path.display()))
}

fn theme_with<S: PreferenceStore>(
    mut preference: ThemePreference<S>,
    system: &dyn SystemSchemeSource,
    command: ThemeCommand,
) -> Result<String> {
    match command {
        ThemeCommand::Get => {
            let scheme = preference.initial(system);
            let origin = if preference.has_persisted() {
                "stored"
            } else {
                "system"
            };
            Ok(format!("{scheme} ({origin})"))
        }
        ThemeCommand::Set(scheme) => {
            preference.set(scheme);
            ensure_persisted(&preference, scheme)?;
            Ok(scheme.to_string())
        }
        ThemeCommand::Toggle => {
            let mut state = ThemeState::init(preference, system).with_transitions(false);
            let scheme = state.toggle();
            ensure_persisted(state.preference(), scheme)?;
            Ok(scheme.to_string())
        }
        ThemeCommand::Clear => {
            preference.clear();
            if preference.has_persisted() {
                bail!("failed to clear the stored theme");
            }
            Ok(format!("cleared, following system ({})", preference.initial(system)))
        }
    }
}

fn ensure_persisted<S: PreferenceStore>(
    preference: &ThemePreference<S>,
    scheme: ColorScheme,
) -> Result<()> {
    if preference.persisted() != Some(scheme) {
        bail!("failed to store theme {scheme}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_app::config::StorageConfig;

    fn config_in(dir: &Path) -> FolioConfig {
        FolioConfig {
            storage: StorageConfig {
                preferences: Some(dir.join("preferences.toml")),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_theme_commands_share_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let light = FixedSchemeSource::new(Some(ColorScheme::Light));
        let open = || ThemePreference::new(preference_store(&config).unwrap());

        assert_eq!(theme_with(open(), &light, ThemeCommand::Get).unwrap(), "light (system)");
        assert_eq!(
            theme_with(open(), &light, ThemeCommand::Set(ColorScheme::Dark)).unwrap(),
            "dark"
        );
        assert_eq!(theme_with(open(), &light, ThemeCommand::Get).unwrap(), "dark (stored)");
        assert_eq!(theme_with(open(), &light, ThemeCommand::Toggle).unwrap(), "light");
        assert_eq!(
            theme_with(open(), &light, ThemeCommand::Clear).unwrap(),
            "cleared, following system (light)"
        );
        assert!(!open().has_persisted());
    }

    #[test]
    fn test_render_with_forced_theme() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out = dir.path().join("index.html");

        render(&config, Some(&out), Some("dark")).unwrap();
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("<body class=\"theme-dark\""));
        // Forcing a theme leaves the preference file alone
        assert!(!dir.path().join("preferences.toml").exists());

        assert!(render(&config, Some(&out), Some("sepia")).is_err());
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[viewport]\nwidth = 800\nheight = 600\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.viewport.width, 800.0);

        let missing = dir.path().join("missing.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("missing.toml"));
    }

    #[test]
    fn test_scenario_file_runs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("smoke.json");
        std::fs::write(
            &file,
            r#"{ "steps": [ { "type": "wait", "ms": 100 }, { "type": "assert_theme", "scheme": "light" } ] }"#,
        )
        .unwrap();
        assert!(scenario(config_in(dir.path()), &file, None).unwrap());

        std::fs::write(
            &file,
            r#"{ "steps": [ { "type": "assert_theme", "scheme": "dark" } ] }"#,
        )
        .unwrap();
        assert!(!scenario(config_in(dir.path()), &file, None).unwrap());
    }
}
