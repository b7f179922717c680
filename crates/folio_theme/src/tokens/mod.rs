//! Design tokens for theming
//!
//! Only colors vary between the light and dark schemes; spacing and
//! typography live in the stylesheet.

mod color;

pub use color::*;
