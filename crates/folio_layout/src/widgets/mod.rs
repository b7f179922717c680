//! Interaction widgets

pub mod deck;
pub mod glow;
pub mod scroller;
