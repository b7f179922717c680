//! Headless runtime primitives for scenario execution.

use anyhow::{bail, Result};
use folio_core::Viewport;

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Logical viewport width used by the headless run.
    pub width: u32,
    /// Logical viewport height used by the headless run.
    pub height: u32,
    /// Number of frames to execute.
    pub max_frames: u32,
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            max_frames: 1,
            tick_ms: 16,
        }
    }
}

impl HeadlessRunConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    pub elapsed_ms: u64,
}

/// Deterministic headless runtime loop.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Check a configuration before any state is touched
    pub fn validate(cfg: &HeadlessRunConfig) -> Result<()> {
        if cfg.width == 0 || cfg.height == 0 {
            bail!("headless dimensions must be non-zero");
        }
        if cfg.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if cfg.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }

    /// Run a fixed frame budget in headless mode.
    pub fn run<F>(cfg: HeadlessRunConfig, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&HeadlessContext),
    {
        Self::validate(&cfg)?;

        for frame in 0..cfg.max_frames {
            on_frame(&HeadlessContext {
                frame_index: frame,
                elapsed_ms: cfg.tick_ms.saturating_mul(frame as u64),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_frame_budget() {
        let cfg = HeadlessRunConfig {
            max_frames: 3,
            ..HeadlessRunConfig::default()
        };
        let mut seen = Vec::new();
        HeadlessRuntime::run(cfg, |ctx| seen.push((ctx.frame_index, ctx.elapsed_ms))).unwrap();
        assert_eq!(seen, [(0, 0), (1, 16), (2, 32)]);
    }

    #[test]
    fn test_rejects_zero_tick() {
        let cfg = HeadlessRunConfig {
            tick_ms: 0,
            ..HeadlessRunConfig::default()
        };
        assert!(HeadlessRuntime::run(cfg, |_| {}).is_err());
    }
}
