//! Folio Layout
//!
//! The element tree pages are composed into, plus the interaction widgets
//! that mutate it: the swipeable card deck, the one-shot reveal observer,
//! the duplicated marquee row and the pointer-following glow.
//!
//! Widgets never touch a missing node: an unresolved anchor is a no-op.

pub mod element;
pub mod gesture;
pub mod reveal;
pub mod tree;
pub mod widgets;

pub use element::{div, el, ElementBuilder};
pub use gesture::{DragTracker, GestureFrame};
pub use reveal::{visible_fraction, RevealId, RevealObserver, RevealTracker};
pub use tree::{ElementTree, Node, NodeId, NodeKind};
pub use widgets::deck::{
    CardEvent, CardPose, CardState, DeckConfig, DeckEngine, DeckMode, FixedRotations,
    GestureOutcome, RotationSource, SeededRotation,
};
pub use widgets::glow::PointerGlow;
pub use widgets::scroller::{InfiniteScroller, MarqueeLoop};

/// Commonly used imports
pub mod prelude {
    pub use crate::element::{div, el, ElementBuilder};
    pub use crate::tree::{ElementTree, NodeId};
    pub use crate::widgets::deck::{CardPose, DeckConfig, DeckEngine, DeckMode};
}
