//! Integration tests for state machines + timers + spring animation
//!
//! These tests verify that:
//! - FSM state transitions can drive spring targets
//! - Timers fire deferred transitions on the same logical clock
//! - Springs keep moving independently of state bookkeeping

use folio_animation::{AnimationScheduler, SpringConfig};
use folio_core::fsm::{StateMachine, StateTransitions};
use folio_core::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
enum PanelState {
    #[default]
    Closed,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy)]
enum PanelEvent {
    Open,
    Close,
    CloseTimerFired,
}

impl StateTransitions<PanelEvent> for PanelState {
    fn on_event(&self, event: &PanelEvent) -> Option<Self> {
        match (self, event) {
            (PanelState::Closed, PanelEvent::Open) => Some(PanelState::Open),
            (PanelState::Open, PanelEvent::Close) => Some(PanelState::Closing),
            (PanelState::Closing, PanelEvent::CloseTimerFired) => Some(PanelState::Closed),
            _ => None,
        }
    }
}

fn target_for(state: PanelState) -> f32 {
    match state {
        PanelState::Closed | PanelState::Closing => 0.0,
        PanelState::Open => 240.0,
    }
}

#[test]
fn test_fsm_transition_drives_spring_target() {
    let mut fsm = StateMachine::new(PanelState::Closed);
    let mut scheduler = AnimationScheduler::new();
    let width = scheduler.spawn(SpringConfig::stiff(), 0.0);

    let state = fsm.send(&PanelEvent::Open).unwrap();
    scheduler.animate_to(width, target_for(state), SpringConfig::stiff());
    assert!(scheduler.has_active_animations());

    for _ in 0..120 {
        scheduler.tick(1.0 / 60.0);
    }
    assert_eq!(scheduler.value(width), 240.0);
}

#[test]
fn test_timer_completes_deferred_transition() {
    let mut fsm = StateMachine::new(PanelState::Closed);
    let mut timers = TimerQueue::new();
    let mut scheduler = AnimationScheduler::new();
    let width = scheduler.spawn(SpringConfig::stiff(), 240.0);

    fsm.send(&PanelEvent::Open);
    let state = fsm.send(&PanelEvent::Close).unwrap();
    assert_eq!(state, PanelState::Closing);
    scheduler.animate_to(width, target_for(state), SpringConfig::stiff());
    timers.schedule(300, PanelEvent::CloseTimerFired);

    let mut elapsed = 0;
    while elapsed < 1000 {
        for event in timers.advance(16) {
            fsm.send(&event);
        }
        scheduler.tick(0.016);
        elapsed += 16;
        if elapsed < 300 {
            assert!(fsm.is_in(PanelState::Closing));
        }
    }

    assert!(fsm.is_in(PanelState::Closed));
    assert!(scheduler.value(width).abs() < 0.01);
    assert_eq!(
        fsm.history(),
        &[
            (PanelState::Closed, PanelState::Open),
            (PanelState::Open, PanelState::Closing),
            (PanelState::Closing, PanelState::Closed),
        ]
    );
}
