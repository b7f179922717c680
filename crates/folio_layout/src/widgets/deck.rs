//! Swipeable card deck
//!
//! Each card owns five springs (x, y, rotation, scale, opacity) on a shared
//! [`AnimationScheduler`]. Dragging a card moves it 1:1 with the pointer; a
//! release faster than the trigger velocity flicks it off screen, anything
//! slower springs it back onto the stack. Once every card is gone a single
//! reset timer brings the whole deck back.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Point, Viewport};
//! use folio_layout::{DeckConfig, DeckEngine, FixedRotations};
//!
//! let mut deck = DeckEngine::with_rotation_source(
//!     2,
//!     DeckConfig::default(),
//!     Viewport::new(1280.0, 720.0),
//!     Box::new(FixedRotations::new(vec![3.0, -2.0])),
//! );
//!
//! deck.pointer_down(1, Point::new(600.0, 300.0), 0);
//! deck.pointer_move(Point::new(610.0, 300.0), 16);
//! deck.pointer_move(Point::new(618.0, 300.0), 32);
//! deck.pointer_up(Point::new(618.0, 300.0), 40);
//!
//! assert!(deck.is_dismissed(1));
//! assert_eq!(deck.dismissed(), vec![1]);
//! ```

use crate::gesture::{DragTracker, GestureFrame};
use folio_animation::{AnimationScheduler, SpringConfig, SpringId};
use folio_core::fsm::{StateMachine, StateTransitions};
use folio_core::timer::{TimerId, TimerQueue};
use folio_core::{Point, Rect, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// Pose
// ============================================================================

/// Animated transform of one card
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPose {
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub rot: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Default for CardPose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rot: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl CardPose {
    /// Inner card transform: tilted perspective, rotation and scale
    pub fn transform_css(&self) -> String {
        format!(
            "perspective(1500px) rotateX(30deg) rotateY({}deg) rotateZ({}deg) scale({})",
            css_number(self.rot / 20.0),
            css_number(self.rot),
            css_number(self.scale)
        )
    }

    /// Outer wrapper translation
    pub fn translate_css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0)",
            css_number(self.x),
            css_number(self.y)
        )
    }

    /// Every component within `tolerance` (scale and opacity scaled down)
    pub fn is_near(&self, other: &CardPose, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.rot - other.rot).abs() <= tolerance
            && (self.scale - other.scale).abs() <= tolerance / 100.0
            && (self.opacity - other.opacity).abs() <= tolerance / 100.0
    }
}

/// Three decimals, no trailing zeros, no negative zero
fn css_number(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

// ============================================================================
// Card State Machine
// ============================================================================

/// Per-card interaction state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardState {
    /// On the stack, at or springing toward its resting pose
    #[default]
    Resting,
    /// Following the pointer
    Dragging,
    /// Flicked away; stays here until the deck resets
    FlyingOut,
    /// Returning to the stack after a reset
    Resetting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEvent {
    /// Pointer down on the card
    Grab,
    /// Released below the trigger velocity
    Release,
    /// Released above the trigger velocity
    Dismiss,
    /// The deck reset timer fired
    Reset,
    /// Every spring reached the resting pose
    Settle,
}

impl StateTransitions<CardEvent> for CardState {
    fn on_event(&self, event: &CardEvent) -> Option<Self> {
        match (self, event) {
            (CardState::Resting | CardState::Resetting, CardEvent::Grab) => {
                Some(CardState::Dragging)
            }
            (CardState::Dragging, CardEvent::Release) => Some(CardState::Resting),
            (CardState::Dragging, CardEvent::Dismiss) => Some(CardState::FlyingOut),
            (CardState::FlyingOut, CardEvent::Reset) => Some(CardState::Resetting),
            (CardState::Resetting, CardEvent::Settle) => Some(CardState::Resting),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Which of the two deck behaviours to run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckMode {
    /// Cards fall in from above with a per-index delay
    #[default]
    EntranceAnimated,
    /// Cards start fanned; page scroll lifts and grows them
    ScrollLinked,
}

/// Policy constants for the deck
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub mode: DeckMode,
    /// Release speed in px/ms above which a card is dismissed
    pub trigger_velocity: f32,
    /// Extra distance past the viewport edge for dismissed cards
    pub fly_out_margin: f32,
    /// Rotation added per px/ms of release speed when dismissed
    pub rotation_kick: f32,
    /// Drag distance in px per degree of rotation
    pub drag_rotation_divisor: f32,
    /// Scale while held
    pub drag_scale: f32,
    pub reset_delay_ms: u64,
    /// Vertical offset between stacked cards
    pub stack_step_y: f32,
    /// Resting rotations are drawn from `[-max, max)`
    pub max_rest_rotation: f32,
    pub entrance_offset_y: f32,
    pub entrance_scale: f32,
    pub entrance_stagger_ms: u64,
    /// Maximum upward shift of the top card at full scroll progress
    pub scroll_lift: f32,
    /// Maximum extra scale of the top card at full scroll progress
    pub scroll_grow: f32,
    /// Seed for resting rotations; `None` seeds from the OS
    pub seed: Option<u64>,
    pub settle_spring: SpringConfig,
    pub active_spring: SpringConfig,
    pub restore_spring: SpringConfig,
    pub fly_out_spring: SpringConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            mode: DeckMode::EntranceAnimated,
            trigger_velocity: 0.2,
            fly_out_margin: 200.0,
            rotation_kick: 10.0,
            drag_rotation_divisor: 100.0,
            drag_scale: 1.1,
            reset_delay_ms: 600,
            stack_step_y: -4.0,
            max_rest_rotation: 10.0,
            entrance_offset_y: -1000.0,
            entrance_scale: 1.5,
            entrance_stagger_ms: 100,
            scroll_lift: 60.0,
            scroll_grow: 0.08,
            seed: None,
            settle_spring: SpringConfig::standard(),
            active_spring: SpringConfig::new(800.0, 50.0, 1.0),
            restore_spring: SpringConfig::new(500.0, 50.0, 1.0),
            fly_out_spring: SpringConfig::new(200.0, 50.0, 1.0),
        }
    }
}

impl DeckConfig {
    pub fn scroll_linked() -> Self {
        Self {
            mode: DeckMode::ScrollLinked,
            ..Default::default()
        }
    }
}

// ============================================================================
// Rotation Sources
// ============================================================================

/// Supplies the resting rotation of each card in degrees
pub trait RotationSource {
    fn rotation(&mut self, index: usize, max_degrees: f32) -> f32;
}

/// Uniform rotations from a seedable RNG
#[derive(Clone, Debug)]
pub struct SeededRotation {
    rng: StdRng,
}

impl SeededRotation {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RotationSource for SeededRotation {
    fn rotation(&mut self, _index: usize, max_degrees: f32) -> f32 {
        if max_degrees <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-max_degrees..max_degrees)
    }
}

/// Replays a fixed list, cycling when exhausted
#[derive(Clone, Debug, Default)]
pub struct FixedRotations {
    values: Vec<f32>,
    next: usize,
}

impl FixedRotations {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, next: 0 }
    }
}

impl RotationSource for FixedRotations {
    fn rotation(&mut self, _index: usize, _max_degrees: f32) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

// ============================================================================
// Engine
// ============================================================================

/// What a gesture frame did to the deck
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Unknown or dismissed card, or another drag in progress
    Ignored,
    Dragging,
    /// Released below the trigger; springing back
    Restored,
    /// Flicked away; `remaining` cards are still on the stack
    Dismissed { remaining: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeckTimer {
    Reset,
    Enter(usize),
}

#[derive(Clone, Copy, Debug)]
struct PoseSprings {
    x: SpringId,
    y: SpringId,
    rot: SpringId,
    scale: SpringId,
    opacity: SpringId,
}

impl PoseSprings {
    fn spawn(scheduler: &mut AnimationScheduler, config: SpringConfig, pose: CardPose) -> Self {
        Self {
            x: scheduler.spawn(config, pose.x),
            y: scheduler.spawn(config, pose.y),
            rot: scheduler.spawn(config, pose.rot),
            scale: scheduler.spawn(config, pose.scale),
            opacity: scheduler.spawn(config, pose.opacity),
        }
    }

    fn ids(&self) -> [SpringId; 5] {
        [self.x, self.y, self.rot, self.scale, self.opacity]
    }
}

#[derive(Clone, Debug)]
struct Card {
    springs: PoseSprings,
    rest: CardPose,
    fsm: StateMachine<CardState, CardEvent>,
    /// Waiting for its staggered entrance timer
    awaiting_entry: bool,
}

/// Pose store and gesture interpreter for a deck of `N` cards
pub struct DeckEngine {
    config: DeckConfig,
    cards: Vec<Card>,
    dismissed: FxHashSet<usize>,
    scheduler: AnimationScheduler,
    timers: TimerQueue<DeckTimer>,
    reset_timer: Option<TimerId>,
    rotations: Box<dyn RotationSource>,
    viewport: Viewport,
    drag: Option<(usize, DragTracker)>,
    scroll_progress: f32,
    reset_count: u32,
}

impl DeckEngine {
    /// Deck whose rotations come from `config.seed`, or the OS when unset
    pub fn new(count: usize, config: DeckConfig, viewport: Viewport) -> Self {
        let rotations: Box<dyn RotationSource> = match config.seed {
            Some(seed) => Box::new(SeededRotation::new(seed)),
            None => Box::new(SeededRotation::from_os_rng()),
        };
        Self::with_rotation_source(count, config, viewport, rotations)
    }

    pub fn with_rotation_source(
        count: usize,
        config: DeckConfig,
        viewport: Viewport,
        rotations: Box<dyn RotationSource>,
    ) -> Self {
        let mut deck = Self {
            config,
            cards: Vec::with_capacity(count),
            dismissed: FxHashSet::default(),
            scheduler: AnimationScheduler::new(),
            timers: TimerQueue::new(),
            reset_timer: None,
            rotations,
            viewport,
            drag: None,
            scroll_progress: 0.0,
            reset_count: 0,
        };

        for index in 0..count {
            let rest = deck.draw_rest_pose(index);
            let initial = match deck.config.mode {
                DeckMode::EntranceAnimated => deck.entrance_pose(),
                DeckMode::ScrollLinked => rest,
            };
            let springs = PoseSprings::spawn(&mut deck.scheduler, deck.config.settle_spring, initial);
            deck.cards.push(Card {
                springs,
                rest,
                fsm: StateMachine::new(CardState::Resting),
                awaiting_entry: false,
            });
        }
        if deck.config.mode == DeckMode::EntranceAnimated {
            deck.deal();
        }

        tracing::debug!(count, mode = ?deck.config.mode, "deck mounted");
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn mode(&self) -> DeckMode {
        self.config.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current animated pose
    pub fn pose(&self, index: usize) -> Option<CardPose> {
        let card = self.cards.get(index)?;
        let s = &card.springs;
        Some(CardPose {
            x: self.scheduler.value(s.x),
            y: self.scheduler.value(s.y),
            rot: self.scheduler.value(s.rot),
            scale: self.scheduler.value(s.scale),
            opacity: self.scheduler.value(s.opacity),
        })
    }

    /// Resting fan pose, before any scroll adjustment
    pub fn rest_pose(&self, index: usize) -> Option<CardPose> {
        self.cards.get(index).map(|c| c.rest)
    }

    pub fn state(&self, index: usize) -> Option<CardState> {
        self.cards.get(index).map(|c| c.fsm.current_state())
    }

    pub fn history(&self, index: usize) -> &[(CardState, CardState)] {
        self.cards
            .get(index)
            .map(|c| c.fsm.history())
            .unwrap_or(&[])
    }

    pub fn is_dismissed(&self, index: usize) -> bool {
        self.dismissed.contains(&index)
    }

    /// Dismissed indices in ascending order
    pub fn dismissed(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.dismissed.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn dismissed_count(&self) -> usize {
        self.dismissed.len()
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_timer.is_some()
    }

    /// Number of times the deck has been reset
    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }

    /// Card currently held by the pointer
    pub fn dragging_index(&self) -> Option<usize> {
        self.drag.as_ref().map(|(index, _)| *index)
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    /// Springs moving or timers pending
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations() || !self.timers.is_empty()
    }

    /// Track the viewport; fly-out distance uses the width at release time
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ------------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------------

    /// Pointer down on card `index`
    pub fn pointer_down(&mut self, index: usize, pos: Point, time_ms: u64) -> GestureOutcome {
        if self.drag.is_some() || index >= self.cards.len() || self.is_dismissed(index) {
            return GestureOutcome::Ignored;
        }
        let mut tracker = DragTracker::new();
        let frame = tracker.begin(pos, time_ms);
        self.drag = Some((index, tracker));
        self.apply_gesture(index, &frame)
    }

    pub fn pointer_move(&mut self, pos: Point, time_ms: u64) -> GestureOutcome {
        let Some((index, tracker)) = self.drag.as_mut() else {
            return GestureOutcome::Ignored;
        };
        let index = *index;
        let frame = tracker.update(pos, time_ms);
        self.apply_gesture(index, &frame)
    }

    pub fn pointer_up(&mut self, pos: Point, time_ms: u64) -> GestureOutcome {
        let Some((index, mut tracker)) = self.drag.take() else {
            return GestureOutcome::Ignored;
        };
        let frame = tracker.end(pos, time_ms);
        self.apply_gesture(index, &frame)
    }

    /// Pointer lost mid-drag: release with no velocity
    pub fn pointer_cancel(&mut self) -> GestureOutcome {
        let Some((index, mut tracker)) = self.drag.take() else {
            return GestureOutcome::Ignored;
        };
        tracker.cancel();
        let frame = GestureFrame {
            active: false,
            velocity: Point::default(),
            ..tracker.end(Point::default(), 0)
        };
        self.apply_gesture(index, &frame)
    }

    /// Apply one gesture frame to card `index`. Only that card is touched.
    pub fn apply_gesture(&mut self, index: usize, frame: &GestureFrame) -> GestureOutcome {
        if self.dismissed.contains(&index) {
            tracing::trace!(index, "gesture on dismissed card ignored");
            return GestureOutcome::Ignored;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return GestureOutcome::Ignored;
        };
        let config = &self.config;
        let movement = frame.movement.x;
        let springs = card.springs;

        if frame.active {
            if card.fsm.send(&CardEvent::Grab).is_some() {
                tracing::debug!(index, "card grabbed");
            }
            card.awaiting_entry = false;
            let spring = config.active_spring;
            self.scheduler.animate_to(springs.x, movement, spring);
            self.scheduler
                .animate_to(springs.rot, movement / config.drag_rotation_divisor, spring);
            self.scheduler
                .animate_to(springs.scale, config.drag_scale, spring);
            return GestureOutcome::Dragging;
        }

        // A release without a prior active frame still counts as a flick
        card.fsm.send(&CardEvent::Grab);

        let dir = frame.horizontal_sign();
        let vx = frame.velocity.x;
        if vx > config.trigger_velocity {
            self.dismissed.insert(index);
            card.fsm.send(&CardEvent::Dismiss);

            let spring = config.fly_out_spring;
            let x = dir * (self.viewport.width + config.fly_out_margin);
            let rot = movement / config.drag_rotation_divisor + dir * config.rotation_kick * vx;
            self.scheduler.animate_to(springs.x, x, spring);
            self.scheduler.animate_to(springs.rot, rot, spring);
            self.scheduler.animate_to(springs.scale, 1.0, spring);

            let remaining = self.cards.len() - self.dismissed.len();
            tracing::debug!(index, vx, remaining, "card dismissed");
            if remaining == 0 && self.reset_timer.is_none() {
                let delay = self.config.reset_delay_ms;
                self.reset_timer = Some(self.timers.schedule(delay, DeckTimer::Reset));
                tracing::debug!(delay_ms = delay, "deck cleared, reset scheduled");
            }
            GestureOutcome::Dismissed { remaining }
        } else {
            card.fsm.send(&CardEvent::Release);
            let rest = card.rest;

            // Also covers a card caught before its entrance or mid-deal
            let spring = config.restore_spring;
            let target = self.scroll_target(index, rest);
            self.scheduler.animate_to(springs.x, 0.0, spring);
            self.scheduler.animate_to(springs.y, target.y, spring);
            self.scheduler.animate_to(springs.rot, rest.rot, spring);
            self.scheduler.animate_to(springs.scale, target.scale, spring);
            self.scheduler
                .animate_to(springs.opacity, target.opacity, spring);
            tracing::trace!(index, vx, "card restored");
            GestureOutcome::Restored
        }
    }

    // ------------------------------------------------------------------------
    // Passive scroll link
    // ------------------------------------------------------------------------

    /// Recompute scroll-driven poses. `container` is the deck's document-space
    /// bounds. Returns the progress used, or `None` when nothing was updated.
    pub fn scroll_link(&mut self, viewport: &Viewport, container: Rect) -> Option<f32> {
        self.viewport = *viewport;
        if self.config.mode != DeckMode::ScrollLinked {
            return None;
        }
        if !container.intersects(&viewport.visible_rect()) {
            return None;
        }

        let span = container.height() + viewport.height;
        let progress = if span <= 0.0 {
            0.0
        } else {
            ((viewport.scroll_y + viewport.height - container.y()) / span).clamp(0.0, 1.0)
        };
        self.scroll_progress = progress;

        for index in 0..self.cards.len() {
            let card = &self.cards[index];
            if self.dismissed.contains(&index) || card.fsm.is_in(CardState::Dragging) {
                continue;
            }
            let target = self.scroll_target(index, card.rest);
            let springs = card.springs;
            self.scheduler.snap_to(springs.y, target.y);
            self.scheduler.snap_to(springs.scale, target.scale);
        }
        tracing::trace!(progress, "deck scroll link");
        Some(progress)
    }

    /// Resting pose adjusted for the current scroll progress. The top card
    /// (highest index) moves the most.
    fn scroll_target(&self, index: usize, rest: CardPose) -> CardPose {
        if self.config.mode != DeckMode::ScrollLinked || self.cards.is_empty() {
            return rest;
        }
        let depth = (index + 1) as f32 / self.cards.len() as f32;
        let p = self.scroll_progress;
        CardPose {
            y: rest.y - p * self.config.scroll_lift * depth,
            scale: rest.scale + p * self.config.scroll_grow * depth,
            ..rest
        }
    }

    // ------------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------------

    /// Advance timers and springs by `dt_ms`
    pub fn tick(&mut self, dt_ms: u64) {
        for timer in self.timers.advance(dt_ms) {
            match timer {
                DeckTimer::Reset => self.fire_reset(),
                DeckTimer::Enter(index) => {
                    if self.cards.get(index).is_some_and(|c| c.awaiting_entry) {
                        self.settle_to_rest(index);
                    }
                }
            }
        }

        self.scheduler.tick(dt_ms as f32 / 1000.0);

        for card in &mut self.cards {
            if card.fsm.is_in(CardState::Resetting)
                && !card.awaiting_entry
                && card
                    .springs
                    .ids()
                    .iter()
                    .all(|id| self.scheduler.get_spring(*id).map_or(true, |s| s.is_settled()))
            {
                card.fsm.send(&CardEvent::Settle);
            }
        }
    }

    fn fire_reset(&mut self) {
        self.reset_timer = None;
        self.dismissed.clear();
        self.reset_count += 1;

        for index in 0..self.cards.len() {
            let rest = self.draw_rest_pose(index);
            let card = &mut self.cards[index];
            card.fsm.send(&CardEvent::Reset);
            card.rest = rest;
        }
        tracing::debug!(resets = self.reset_count, "deck reset");
        self.deal();
    }

    /// Send every card toward its resting pose, staggered in entrance mode
    fn deal(&mut self) {
        for index in 0..self.cards.len() {
            let delay = match self.config.mode {
                DeckMode::EntranceAnimated => self.config.entrance_stagger_ms * index as u64,
                DeckMode::ScrollLinked => 0,
            };
            if delay == 0 {
                self.settle_to_rest(index);
            } else {
                self.cards[index].awaiting_entry = true;
                self.timers.schedule(delay, DeckTimer::Enter(index));
            }
        }
    }

    fn settle_to_rest(&mut self, index: usize) {
        let Some(card) = self.cards.get(index) else {
            return;
        };
        // A card grabbed while waiting keeps following the pointer
        if card.fsm.is_in(CardState::Dragging) {
            return;
        }
        let target = self.scroll_target(index, card.rest);
        let springs = card.springs;
        let spring = self.config.settle_spring;
        self.scheduler.animate_to(springs.x, target.x, spring);
        self.scheduler.animate_to(springs.y, target.y, spring);
        self.scheduler.animate_to(springs.rot, target.rot, spring);
        self.scheduler.animate_to(springs.scale, target.scale, spring);
        self.scheduler.animate_to(springs.opacity, target.opacity, spring);
        self.cards[index].awaiting_entry = false;
    }

    fn draw_rest_pose(&mut self, index: usize) -> CardPose {
        CardPose {
            x: 0.0,
            y: index as f32 * self.config.stack_step_y,
            rot: self.rotations.rotation(index, self.config.max_rest_rotation),
            scale: 1.0,
            opacity: 1.0,
        }
    }

    fn entrance_pose(&self) -> CardPose {
        CardPose {
            x: 0.0,
            y: self.config.entrance_offset_y,
            rot: 0.0,
            scale: self.config.entrance_scale,
            opacity: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(mode: DeckMode, rotations: Vec<f32>) -> DeckEngine {
        DeckEngine::with_rotation_source(
            4,
            DeckConfig {
                mode,
                ..Default::default()
            },
            Viewport::new(1280.0, 720.0),
            Box::new(FixedRotations::new(rotations)),
        )
    }

    fn run(deck: &mut DeckEngine, ms: u64) {
        for _ in 0..ms / 16 {
            deck.tick(16);
        }
        deck.tick(ms % 16);
    }

    fn release(velocity: f32, movement: f32) -> GestureFrame {
        GestureFrame {
            movement: Point::new(movement, 0.0),
            velocity: Point::new(velocity, 0.0),
            direction: Point::new(movement.signum(), 0.0),
            active: false,
        }
    }

    #[test]
    fn test_css_output() {
        let pose = CardPose {
            x: 12.5,
            y: -4.0,
            rot: 5.0,
            scale: 1.1,
            opacity: 1.0,
        };
        assert_eq!(pose.translate_css(), "translate3d(12.5px, -4px, 0)");
        assert_eq!(
            pose.transform_css(),
            "perspective(1500px) rotateX(30deg) rotateY(0.25deg) rotateZ(5deg) scale(1.1)"
        );
        assert_eq!(css_number(-0.0001), "0");
    }

    #[test]
    fn test_fsm_transitions() {
        let mut fsm = StateMachine::new(CardState::Resting);
        assert_eq!(fsm.send(&CardEvent::Dismiss), None);
        assert_eq!(fsm.send(&CardEvent::Grab), Some(CardState::Dragging));
        assert_eq!(fsm.send(&CardEvent::Dismiss), Some(CardState::FlyingOut));
        assert_eq!(fsm.send(&CardEvent::Grab), None);
        assert_eq!(fsm.send(&CardEvent::Reset), Some(CardState::Resetting));
        assert_eq!(fsm.send(&CardEvent::Settle), Some(CardState::Resting));
    }

    #[test]
    fn test_entrance_springs_to_fan() {
        let mut deck = deck(DeckMode::EntranceAnimated, vec![4.0, -3.0, 8.0, -9.5]);
        let start = deck.pose(3).unwrap();
        assert_eq!(start.y, -1000.0);
        assert_eq!(start.scale, 1.5);
        assert_eq!(start.opacity, 0.0);

        run(&mut deck, 200);
        // index 3 enters at 300ms and has not moved yet
        assert_eq!(deck.pose(3).unwrap().y, -1000.0);
        assert!(deck.pose(0).unwrap().y > -1000.0);

        run(&mut deck, 3000);
        for i in 0..4 {
            let rest = deck.rest_pose(i).unwrap();
            assert!(deck.pose(i).unwrap().is_near(&rest, 0.01), "card {i}");
        }
        assert_eq!(deck.rest_pose(2).unwrap().y, -8.0);
        assert_eq!(deck.rest_pose(3).unwrap().rot, -9.5);
    }

    #[test]
    fn test_scroll_linked_starts_at_rest() {
        let deck = deck(DeckMode::ScrollLinked, vec![1.0]);
        assert_eq!(deck.pose(1), deck.rest_pose(1));
        assert!(!deck.is_animating());
    }

    #[test]
    fn test_drag_tracks_pointer() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![2.0]);
        deck.pointer_down(0, Point::new(500.0, 300.0), 0);
        deck.pointer_move(Point::new(650.0, 300.0), 16);
        assert_eq!(deck.state(0), Some(CardState::Dragging));
        assert_eq!(deck.dragging_index(), Some(0));

        run(&mut deck, 1000);
        let pose = deck.pose(0).unwrap();
        assert!((pose.x - 150.0).abs() < 0.01);
        assert!((pose.rot - 1.5).abs() < 0.01);
        assert!((pose.scale - 1.1).abs() < 0.001);
        assert_eq!(deck.pointer_down(1, Point::new(0.0, 0.0), 20), GestureOutcome::Ignored);
    }

    #[test]
    fn test_slow_release_restores() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![2.0, 3.0, 4.0, 5.0]);
        deck.apply_gesture(1, &GestureFrame {
            active: true,
            ..release(0.0, 80.0)
        });
        let outcome = deck.apply_gesture(1, &release(0.1, 80.0));
        assert_eq!(outcome, GestureOutcome::Restored);
        assert!(!deck.is_dismissed(1));

        run(&mut deck, 2000);
        let pose = deck.pose(1).unwrap();
        assert!(pose.x.abs() < 0.01);
        assert!((pose.rot - 3.0).abs() < 0.01);
        assert!((pose.scale - 1.0).abs() < 0.001);
        assert_eq!(deck.state(1), Some(CardState::Resting));
    }

    #[test]
    fn test_grab_before_entrance_restores_full_pose() {
        let mut deck = deck(DeckMode::EntranceAnimated, vec![4.0, -3.0, 8.0, -9.5]);
        run(&mut deck, 48);
        assert_eq!(
            deck.pointer_down(3, Point::new(400.0, 300.0), 48),
            GestureOutcome::Dragging
        );
        deck.pointer_move(Point::new(402.0, 300.0), 64);
        // card 3's entrance slot passes while it is held
        run(&mut deck, 352);
        assert_eq!(
            deck.pointer_up(Point::new(402.0, 300.0), 400),
            GestureOutcome::Restored
        );

        run(&mut deck, 3000);
        let rest = deck.rest_pose(3).unwrap();
        let pose = deck.pose(3).unwrap();
        assert!(pose.is_near(&rest, 0.01), "{pose:?}");
        assert!((pose.opacity - 1.0).abs() < 0.001);
        assert_eq!(deck.state(3), Some(CardState::Resting));
        assert!(!deck.is_dismissed(3));
    }

    #[test]
    fn test_fast_release_flies_out_in_direction() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![0.0]);
        assert_eq!(
            deck.apply_gesture(0, &release(0.5, 120.0)),
            GestureOutcome::Dismissed { remaining: 3 }
        );
        assert_eq!(
            deck.apply_gesture(1, &release(0.8, -60.0)),
            GestureOutcome::Dismissed { remaining: 2 }
        );
        run(&mut deck, 3000);

        assert!(deck.pose(0).unwrap().x >= 1280.0);
        assert!(deck.pose(1).unwrap().x <= -1280.0);
        let expected_rot = 120.0 / 100.0 + 10.0 * 0.5;
        assert!((deck.pose(0).unwrap().rot - expected_rot).abs() < 0.01);
        assert_eq!(deck.state(0), Some(CardState::FlyingOut));
        assert!(!deck.reset_pending());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![0.0]);
        assert_eq!(deck.apply_gesture(0, &release(0.2, 50.0)), GestureOutcome::Restored);
    }

    #[test]
    fn test_gesture_touches_only_its_card() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![1.0, 2.0, 3.0, 4.0]);
        let before: Vec<_> = (1..4).map(|i| deck.pose(i).unwrap()).collect();
        deck.apply_gesture(0, &release(0.5, 100.0));
        run(&mut deck, 500);
        let after: Vec<_> = (1..4).map(|i| deck.pose(i).unwrap()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_dismissed_card_ignores_gestures() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![0.0]);
        deck.apply_gesture(2, &release(0.5, 100.0));
        assert_eq!(deck.apply_gesture(2, &release(0.0, 0.0)), GestureOutcome::Ignored);
        assert_eq!(
            deck.pointer_down(2, Point::new(0.0, 0.0), 0),
            GestureOutcome::Ignored
        );
        assert_eq!(deck.dismissed_count(), 1);
    }

    #[test]
    fn test_reset_scheduled_once_and_restores_all() {
        let mut deck = deck(
            DeckMode::EntranceAnimated,
            vec![1.0, 2.0, 3.0, 4.0, -1.0, -2.0, -3.0, -4.0],
        );
        run(&mut deck, 2000);

        for i in 0..4 {
            deck.apply_gesture(i, &release(0.5, 100.0));
            assert!(deck.dismissed_count() <= deck.len());
        }
        assert!(deck.reset_pending());
        assert_eq!(deck.dismissed(), vec![0, 1, 2, 3]);

        run(&mut deck, 599);
        assert_eq!(deck.dismissed_count(), 4);
        run(&mut deck, 1);
        assert_eq!(deck.dismissed_count(), 0);
        assert_eq!(deck.reset_count(), 1);
        assert!(!deck.reset_pending());
        assert_eq!(deck.state(0), Some(CardState::Resetting));

        run(&mut deck, 4000);
        assert_eq!(deck.reset_count(), 1);
        for i in 0..4 {
            assert_eq!(deck.state(i), Some(CardState::Resting));
            assert_eq!(deck.rest_pose(i).unwrap().rot, -(i as f32 + 1.0));
            assert!(deck.pose(i).unwrap().is_near(&deck.rest_pose(i).unwrap(), 0.01));
        }
    }

    #[test]
    fn test_scroll_link_lifts_top_card_most() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![0.0]);
        let container = Rect::new(0.0, 1000.0, 800.0, 500.0);

        let far = Viewport::new(1280.0, 400.0);
        assert_eq!(deck.scroll_link(&far, container), None);

        let viewport = Viewport::new(1280.0, 400.0).with_scroll(1050.0);
        let progress = deck.scroll_link(&viewport, container).unwrap();
        // (1050 + 400 - 1000) / (500 + 400)
        assert!((progress - 0.5).abs() < 1e-6);

        let top = deck.pose(3).unwrap();
        let bottom = deck.pose(0).unwrap();
        assert!((top.y - (-12.0 - 0.5 * 60.0)).abs() < 1e-4);
        assert!((bottom.y - (0.0 - 0.5 * 60.0 * 0.25)).abs() < 1e-4);
        assert!(top.scale > bottom.scale);
    }

    #[test]
    fn test_scroll_link_skips_dragging_and_dismissed() {
        let mut deck = deck(DeckMode::ScrollLinked, vec![0.0]);
        deck.apply_gesture(0, &release(0.5, 100.0));
        deck.pointer_down(1, Point::new(0.0, 0.0), 0);

        let container = Rect::new(0.0, 0.0, 800.0, 500.0);
        let viewport = Viewport::new(1280.0, 400.0).with_scroll(300.0);
        deck.scroll_link(&viewport, container);

        assert_eq!(deck.pose(0).unwrap().y, 0.0);
        assert_eq!(deck.pose(1).unwrap().y, -4.0);
        assert!(deck.pose(2).unwrap().y < -8.0);
    }

    #[test]
    fn test_entrance_mode_ignores_scroll() {
        let mut deck = deck(DeckMode::EntranceAnimated, vec![0.0]);
        let viewport = Viewport::new(1280.0, 400.0);
        assert_eq!(deck.scroll_link(&viewport, Rect::new(0.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn test_seeded_rotations_are_reproducible() {
        let mut a = SeededRotation::new(7);
        let mut b = SeededRotation::new(7);
        for i in 0..8 {
            let ra = a.rotation(i, 10.0);
            assert_eq!(ra, b.rotation(i, 10.0));
            assert!((-10.0..10.0).contains(&ra));
        }
    }

    #[test]
    fn test_config_from_toml() {
        let config: DeckConfig = toml::from_str(
            r#"
            mode = "scroll-linked"
            trigger_velocity = 0.3
            seed = 42

            [fly_out_spring]
            stiffness = 150.0
            damping = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, DeckMode::ScrollLinked);
        assert_eq!(config.trigger_velocity, 0.3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.fly_out_spring.mass, 1.0);
        assert_eq!(config.reset_delay_ms, 600);
    }
}
