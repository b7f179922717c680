//! Pointer-following glow
//!
//! Publishes the pointer position relative to a card as the `--x` / `--y`
//! custom properties consumed by the card's radial highlight.

use crate::tree::{ElementTree, NodeId};
use folio_core::{Point, Rect};

#[derive(Clone, Copy, Debug, Default)]
pub struct PointerGlow;

impl PointerGlow {
    /// Pointer position in the card's local space
    pub fn local_position(bounds: Rect, pointer: Point) -> Point {
        bounds.local_point(pointer)
    }

    /// `--x` / `--y` declarations for a pointer over `bounds`
    pub fn css_variables(bounds: Rect, pointer: Point) -> [(&'static str, String); 2] {
        let local = Self::local_position(bounds, pointer);
        [("--x", format!("{}px", local.x)), ("--y", format!("{}px", local.y))]
    }

    /// Write the glow position onto `card`. Returns false when the card or
    /// its bounds are unknown.
    pub fn apply(tree: &mut ElementTree, card: NodeId, pointer: Point) -> bool {
        let Some(bounds) = tree.bounds(card) else {
            return false;
        };
        for (property, value) in Self::css_variables(bounds, pointer) {
            tree.set_style(card, property, value);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_relative_to_card() {
        let bounds = Rect::new(100.0, 2000.0, 300.0, 200.0);
        let vars = PointerGlow::css_variables(bounds, Point::new(130.0, 2050.5));
        assert_eq!(vars[0], ("--x", "30px".to_string()));
        assert_eq!(vars[1], ("--y", "50.5px".to_string()));
    }

    #[test]
    fn test_apply_sets_style_and_skips_unknown() {
        let mut tree = ElementTree::new();
        let card = tree.create_element("a");
        assert!(!PointerGlow::apply(&mut tree, card, Point::new(1.0, 1.0)));

        tree.set_bounds(card, Rect::new(10.0, 10.0, 50.0, 50.0));
        assert!(PointerGlow::apply(&mut tree, card, Point::new(20.0, 35.0)));
        assert_eq!(tree.style(card, "--x"), Some("10px"));
        assert_eq!(tree.style(card, "--y"), Some("25px"));
    }
}
