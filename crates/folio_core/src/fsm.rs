//! State Machine Runtime
//!
//! Flat, typed state machines for widget interaction states. The state type
//! defines its own transition table through [`StateTransitions`]; the
//! machine tracks the current state and a bounded transition history.

use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// Maximum number of transitions kept in a machine's history
pub const HISTORY_LIMIT: usize = 32;

/// Trait for user-defined state types that can handle event transitions
///
/// # Example
///
/// ```rust
/// use folio_core::fsm::{StateMachine, StateTransitions};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// enum Toggle {
///     #[default]
///     Off,
///     On,
/// }
///
/// impl StateTransitions<()> for Toggle {
///     fn on_event(&self, _event: &()) -> Option<Self> {
///         match self {
///             Toggle::Off => Some(Toggle::On),
///             Toggle::On => Some(Toggle::Off),
///         }
///     }
/// }
///
/// let mut fsm = StateMachine::new(Toggle::Off);
/// fsm.send(&());
/// assert!(fsm.is_in(Toggle::On));
/// ```
pub trait StateTransitions<E>: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: &E) -> Option<Self>;
}

/// A state machine instance
#[derive(Debug, Clone)]
pub struct StateMachine<S, E> {
    current_state: S,
    /// History of state transitions (for debugging)
    history: SmallVec<[(S, S); 4]>,
    _event: PhantomData<fn(&E)>,
}

impl<S, E> StateMachine<S, E>
where
    S: StateTransitions<E>,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            current_state: initial_state,
            history: SmallVec::new(),
            _event: PhantomData,
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: &E) -> bool {
        self.current_state.on_event(event).is_some()
    }

    /// Send an event, returning the new state if a transition happened
    pub fn send(&mut self, event: &E) -> Option<S> {
        let from = self.current_state;
        let to = from.on_event(event)?;
        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((from, to));
        Some(to)
    }

    /// Get transition history
    pub fn history(&self) -> &[(S, S)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl<S, E> Default for StateMachine<S, E>
where
    S: StateTransitions<E> + Default,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}
