//! Scenario definition for headless app runs.

use crate::headless_runtime::HeadlessRunConfig;
use anyhow::{Context, Result};
use folio_theme::ColorScheme;
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless steps, optionally with its own viewport.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub viewport: Option<ScenarioViewport>,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScenarioViewport {
    pub width: u32,
    pub height: u32,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// `base` with this scenario's viewport applied
    pub fn run_config(&self, base: HeadlessRunConfig) -> HeadlessRunConfig {
        match self.viewport {
            Some(ScenarioViewport { width, height }) => HeadlessRunConfig {
                width,
                height,
                ..base
            },
            None => base,
        }
    }
}

fn default_drag_ms() -> u64 {
    96
}

fn default_true() -> bool {
    true
}

fn default_tolerance() -> f32 {
    1.0
}

/// Scenario steps. Pointer coordinates are document space.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Scroll {
        y: f32,
    },
    /// Grab a deck card at its center and move it by `dx`/`dy` over
    /// `duration_ms`, releasing at the final position
    Drag {
        card: usize,
        dx: f32,
        #[serde(default)]
        dy: f32,
        #[serde(default = "default_drag_ms")]
        duration_ms: u64,
    },
    /// Move the pointer over a bento card, `x`/`y` relative to its origin
    HoverProject {
        project: usize,
        x: f32,
        y: f32,
    },
    ToggleTheme,
    SystemScheme {
        scheme: ColorScheme,
    },
    AssertExists {
        id: String,
    },
    AssertTextContains {
        id: String,
        value: String,
    },
    AssertDismissed {
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        cards: Option<Vec<usize>>,
    },
    AssertTheme {
        scheme: ColorScheme,
    },
    AssertRevealed {
        section: String,
        #[serde(default = "default_true")]
        revealed: bool,
    },
    AssertCardNear {
        card: usize,
        #[serde(default)]
        x: Option<f32>,
        #[serde(default)]
        y: Option<f32>,
        #[serde(default)]
        rot: Option<f32>,
        #[serde(default)]
        scale: Option<f32>,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
}
