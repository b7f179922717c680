//! Folio Core Runtime
//!
//! Foundational primitives shared by every Folio crate:
//!
//! - **Geometry**: points, sizes, rects and the scrolled viewport
//! - **Colors**: linear RGBA with hex parsing and CSS output
//! - **Events**: pointer, scroll, resize and color-scheme input events
//! - **State Machines**: typed per-widget interaction states
//! - **Timers**: one-shot actions on a logical millisecond clock
//!
//! # Example
//!
//! ```rust
//! use folio_core::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! timers.schedule(600, "reset");
//!
//! assert!(timers.advance(599).is_empty());
//! assert_eq!(timers.advance(1), vec!["reset"]);
//! ```

pub mod color;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod timer;

pub use color::Color;
pub use events::{Event, EventData, EventType, ListenerId, ListenerRegistry};
pub use fsm::{StateMachine, StateTransitions};
pub use geometry::{Point, Rect, Size, Viewport};
pub use timer::{TimerId, TimerQueue};
