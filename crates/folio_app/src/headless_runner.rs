//! Scenario runner that drives an app through headless steps.
//!
//! Input steps become [`Event`]s addressed by the ids in [`crate::targets`];
//! time advances in fixed frames of `tick_ms`. Assertions read a snapshot
//! that is taken lazily and dropped after any step that changes state.

use crate::headless_assert::{
    evaluate_assert_card_near, evaluate_assert_dismissed, evaluate_assert_exists,
    evaluate_assert_revealed, evaluate_assert_text_contains, evaluate_assert_theme,
    AssertionResult, DiagnosticsSnapshot, ExpectedPose,
};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::targets;
use anyhow::Result;
use folio_core::events::event_types;
use folio_core::{Event, EventData, Point, Rect, Viewport};

/// What the runner needs from an application
pub trait HeadlessApp {
    fn mount(&mut self, viewport: Viewport);
    /// Deliver one event; returns whether anything handled it
    fn dispatch(&mut self, event: &Event) -> bool;
    /// Advance logical time by one frame
    fn advance(&mut self, dt_ms: u64);
    fn snapshot(&self) -> DiagnosticsSnapshot;
    /// Document-space center of a deck card as currently drawn
    fn card_center(&self, index: usize) -> Option<Point>;
    fn project_bounds(&self, index: usize) -> Option<Rect>;
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn into_report(self) -> HeadlessReport {
        match self {
            RunOutcome::Passed { report } | RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against `app`.
pub fn run_scenario<A: HeadlessApp>(
    input: &str,
    runtime_cfg: HeadlessRunConfig,
    app: &mut A,
) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, runtime_cfg, app)
}

/// Execute a pre-loaded scenario against `app`, mounting it first.
pub fn run_loaded_scenario<A: HeadlessApp>(
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
    app: &mut A,
) -> Result<RunOutcome> {
    let cfg = scenario.run_config(runtime_cfg);
    HeadlessRuntime::validate(&cfg)?;
    app.mount(cfg.viewport());
    tracing::debug!(name = ?scenario.name, steps = scenario.steps.len(), "scenario started");

    let mut session = Session {
        app,
        cfg,
        elapsed_frames: 0,
        elapsed_ms: 0,
        latest_snapshot: None,
    };

    for (step_index, step) in scenario.steps.iter().enumerate() {
        if let Some((assertion, code, message)) = session.run_step(step)? {
            tracing::debug!(step_index, assertion, %message, "scenario failed");
            let report = HeadlessReport::failed(
                assertion,
                code,
                step_index,
                message,
                session.elapsed_frames,
                session.elapsed_ms,
            )
            .with_scenario(scenario.name.clone());
            return Ok(RunOutcome::Failed { report });
        }
    }

    let report = HeadlessReport::passed(
        scenario.steps.len(),
        session.elapsed_frames,
        session.elapsed_ms,
    )
    .with_scenario(scenario.name.clone());
    Ok(RunOutcome::Passed { report })
}

/// Step kind, failure code and message
type StepFailure = (&'static str, String, String);

struct Session<'a, A: HeadlessApp> {
    app: &'a mut A,
    cfg: HeadlessRunConfig,
    elapsed_frames: u64,
    elapsed_ms: u64,
    latest_snapshot: Option<DiagnosticsSnapshot>,
}

impl<A: HeadlessApp> Session<'_, A> {
    fn run_step(&mut self, step: &ScenarioStep) -> Result<Option<StepFailure>> {
        let tick_ms = self.cfg.tick_ms;
        match step {
            ScenarioStep::Wait { ms } => {
                let mut remaining_ms = *ms;
                self.run_frames(wait_frames(*ms, tick_ms), || {
                    let step_ms = remaining_ms.min(tick_ms);
                    remaining_ms = remaining_ms.saturating_sub(step_ms);
                    step_ms
                })?;
            }
            ScenarioStep::Tick { frames } => {
                self.run_frames(*frames, || tick_ms)?;
            }
            ScenarioStep::Resize { width, height } => {
                self.dispatch(Event::new(
                    event_types::RESIZE,
                    targets::WINDOW,
                    EventData::Resize {
                        width: *width,
                        height: *height,
                    },
                    self.elapsed_ms,
                ));
            }
            ScenarioStep::Scroll { y } => {
                self.dispatch(Event::new(
                    event_types::SCROLL,
                    targets::WINDOW,
                    EventData::Scroll {
                        scroll_x: 0.0,
                        scroll_y: *y,
                    },
                    self.elapsed_ms,
                ));
            }
            ScenarioStep::Drag {
                card,
                dx,
                dy,
                duration_ms,
            } => {
                let Some(start) = self.app.card_center(*card) else {
                    return Ok(Some(missing("drag", format!("card {card}: not in deck"))));
                };
                self.drag(*card, start, *dx, *dy, *duration_ms)?;
            }
            ScenarioStep::HoverProject { project, x, y } => {
                let Some(bounds) = self.app.project_bounds(*project) else {
                    return Ok(Some(missing(
                        "hover_project",
                        format!("project {project}: element not found"),
                    )));
                };
                self.dispatch(Event::pointer(
                    event_types::POINTER_MOVE,
                    targets::project(*project),
                    bounds.x() + x,
                    bounds.y() + y,
                    self.elapsed_ms,
                ));
            }
            ScenarioStep::ToggleTheme => {
                self.dispatch(Event::new(
                    event_types::CLICK,
                    targets::THEME_TOGGLE,
                    EventData::None,
                    self.elapsed_ms,
                ));
            }
            ScenarioStep::SystemScheme { scheme } => {
                self.dispatch(Event::new(
                    event_types::COLOR_SCHEME_CHANGE,
                    targets::WINDOW,
                    EventData::ColorScheme {
                        dark: scheme.is_dark(),
                    },
                    self.elapsed_ms,
                ));
            }
            ScenarioStep::AssertExists { id } => {
                return Ok(check("assert_exists", evaluate_assert_exists(id, self.snapshot())));
            }
            ScenarioStep::AssertTextContains { id, value } => {
                return Ok(check(
                    "assert_text_contains",
                    evaluate_assert_text_contains(id, value, self.snapshot()),
                ));
            }
            ScenarioStep::AssertDismissed { count, cards } => {
                return Ok(check(
                    "assert_dismissed",
                    evaluate_assert_dismissed(*count, cards.as_deref(), self.snapshot()),
                ));
            }
            ScenarioStep::AssertTheme { scheme } => {
                return Ok(check(
                    "assert_theme",
                    evaluate_assert_theme(*scheme, self.snapshot()),
                ));
            }
            ScenarioStep::AssertRevealed { section, revealed } => {
                return Ok(check(
                    "assert_revealed",
                    evaluate_assert_revealed(section, *revealed, self.snapshot()),
                ));
            }
            ScenarioStep::AssertCardNear {
                card,
                x,
                y,
                rot,
                scale,
                tolerance,
            } => {
                let expected = ExpectedPose {
                    x: *x,
                    y: *y,
                    rot: *rot,
                    scale: *scale,
                };
                return Ok(check(
                    "assert_card_near",
                    evaluate_assert_card_near(*card, expected, *tolerance, self.snapshot()),
                ));
            }
        }
        Ok(None)
    }

    /// Press at `start`, move linearly one frame at a time, release in place
    fn drag(&mut self, card: usize, start: Point, dx: f32, dy: f32, duration_ms: u64) -> Result<()> {
        let target = targets::deck_card(card);
        let tick_ms = self.cfg.tick_ms;
        self.dispatch(Event::pointer(
            event_types::POINTER_DOWN,
            target,
            start.x,
            start.y,
            self.elapsed_ms,
        ));

        let frames = wait_frames(duration_ms, tick_ms).max(1);
        for frame in 1..=frames {
            self.run_frames(1, || tick_ms)?;
            let t = frame as f32 / frames as f32;
            self.dispatch(Event::pointer(
                event_types::POINTER_MOVE,
                target,
                start.x + dx * t,
                start.y + dy * t,
                self.elapsed_ms,
            ));
        }

        self.dispatch(Event::pointer(
            event_types::POINTER_UP,
            target,
            start.x + dx,
            start.y + dy,
            self.elapsed_ms,
        ));
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> bool {
        self.latest_snapshot = None;
        self.app.dispatch(&event)
    }

    fn run_frames<F>(&mut self, frames: u32, mut advance_ms: F) -> Result<()>
    where
        F: FnMut() -> u64,
    {
        if frames == 0 {
            return Ok(());
        }
        self.latest_snapshot = None;

        let mut cfg = self.cfg;
        cfg.max_frames = frames;
        let app = &mut *self.app;
        let elapsed_frames = &mut self.elapsed_frames;
        let elapsed_ms = &mut self.elapsed_ms;
        HeadlessRuntime::run(cfg, |_| {
            let dt = advance_ms();
            app.advance(dt);
            *elapsed_frames = elapsed_frames.saturating_add(1);
            *elapsed_ms = elapsed_ms.saturating_add(dt);
        })
    }

    fn snapshot(&mut self) -> &DiagnosticsSnapshot {
        let app = &*self.app;
        self.latest_snapshot.get_or_insert_with(|| app.snapshot())
    }
}

fn check(assertion: &'static str, result: AssertionResult) -> Option<StepFailure> {
    match result {
        AssertionResult::Passed => None,
        AssertionResult::Failed { code, message } => Some((assertion, code, message)),
    }
}

fn missing(step: &'static str, message: String) -> StepFailure {
    (step, "missing_element".to_string(), message)
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}
