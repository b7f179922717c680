//! Infinite marquee row
//!
//! [`InfiniteScroller`] doubles a row's children once so a constant-speed
//! loop can wrap without a visible seam; [`MarqueeLoop`] drives the offset.

use crate::tree::{ElementTree, NodeId};
use folio_animation::timeline::{Timeline, TimelineEntryId, LOOP_INFINITE};

/// Marker set on the scroller after duplication
pub const ANIMATED_ATTR: &str = "data-animated";

/// Duplicates the inner row of a scroller element exactly once
#[derive(Clone, Debug)]
pub struct InfiniteScroller {
    inner_class: String,
}

impl Default for InfiniteScroller {
    fn default() -> Self {
        Self::new("tech-scroller-inner")
    }
}

impl InfiniteScroller {
    /// Scroller whose row is the first descendant with `inner_class`
    pub fn new(inner_class: impl Into<String>) -> Self {
        Self {
            inner_class: inner_class.into(),
        }
    }

    pub fn is_activated(tree: &ElementTree, scroller: NodeId) -> bool {
        tree.attribute(scroller, ANIMATED_ATTR).is_some()
    }

    /// Clone every row child once, marking clones `aria-hidden`.
    ///
    /// Returns the number of clones appended; 0 when already activated or
    /// when the scroller or its row cannot be found.
    pub fn activate(&self, tree: &mut ElementTree, scroller: NodeId) -> usize {
        if !tree.contains(scroller) || Self::is_activated(tree, scroller) {
            return 0;
        }
        let Some(row) = tree.first_by_class(scroller, &self.inner_class) else {
            tracing::trace!(class = %self.inner_class, "scroller row missing");
            return 0;
        };
        tree.set_attribute(scroller, ANIMATED_ATTR, "true");

        let originals = tree.element_children(row);
        for item in &originals {
            if let Some(copy) = tree.deep_clone(*item) {
                tree.set_attribute(copy, "aria-hidden", "true");
                tree.append_child(row, copy);
            }
        }
        tracing::debug!(items = originals.len(), "marquee row duplicated");
        originals.len()
    }
}

/// Default loop period for the tech marquee
pub const MARQUEE_PERIOD_MS: u32 = 60_000;

/// Constant-speed looping offset for a duplicated row
///
/// One period translates the row by its original content width plus half
/// the gap, so the clone lands exactly where the first original started.
#[derive(Clone, Debug)]
pub struct MarqueeLoop {
    timeline: Timeline,
    entry: TimelineEntryId,
    distance: f32,
}

impl MarqueeLoop {
    pub fn new(period_ms: u32, content_width: f32, gap: f32) -> Self {
        let distance = content_width + gap / 2.0;
        let mut timeline = Timeline::new();
        let entry = timeline.add(0, period_ms.max(1), 0.0, -distance);
        timeline.set_loop(LOOP_INFINITE);
        timeline.start();
        Self {
            timeline,
            entry,
            distance,
        }
    }

    /// Distance covered per period
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn period_ms(&self) -> u32 {
        self.timeline.duration_ms()
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.timeline.tick(dt_ms);
    }

    /// Current horizontal offset in px, from 0 down to `-distance`
    pub fn offset(&self) -> f32 {
        self.timeline.value(self.entry).unwrap_or(0.0)
    }

    pub fn transform_css(&self) -> String {
        format!("translateX({:.2}px)", self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::div;

    fn scroller_tree() -> (ElementTree, NodeId) {
        let tree = ElementTree::from_root(
            div().class("tech-scroller").child(
                div()
                    .class("tech-scroller-inner")
                    .children(["HTML5", "CSS3", "Git"].map(|name| div().class("tech-item").text(name))),
            ),
        );
        let root = tree.root().unwrap();
        (tree, root)
    }

    #[test]
    fn test_activation_is_idempotent() {
        let (mut tree, scroller) = scroller_tree();
        let row = tree.first_by_class(scroller, "tech-scroller-inner").unwrap();
        let duplicator = InfiniteScroller::default();

        assert_eq!(duplicator.activate(&mut tree, scroller), 3);
        assert_eq!(tree.children(row).len(), 6);
        assert_eq!(duplicator.activate(&mut tree, scroller), 0);
        assert_eq!(tree.children(row).len(), 6);
        assert_eq!(tree.attribute(scroller, ANIMATED_ATTR), Some("true"));
    }

    #[test]
    fn test_clones_are_hidden_and_follow_originals() {
        let (mut tree, scroller) = scroller_tree();
        InfiniteScroller::default().activate(&mut tree, scroller);
        let row = tree.first_by_class(scroller, "tech-scroller-inner").unwrap();
        let items = tree.children(row).to_vec();

        for (i, item) in items.iter().enumerate() {
            let hidden = tree.attribute(*item, "aria-hidden") == Some("true");
            assert_eq!(hidden, i >= 3);
        }
        assert_eq!(tree.text_content(items[4]), "CSS3");
    }

    #[test]
    fn test_missing_row_is_noop() {
        let mut tree = ElementTree::from_root(div().class("tech-scroller"));
        let scroller = tree.root().unwrap();
        assert_eq!(InfiniteScroller::default().activate(&mut tree, scroller), 0);
        assert!(!InfiniteScroller::is_activated(&tree, scroller));
    }

    #[test]
    fn test_marquee_is_periodic() {
        let mut marquee = MarqueeLoop::new(1000, 900.0, 40.0);
        assert_eq!(marquee.distance(), 920.0);
        marquee.tick(250.0);
        let quarter = marquee.offset();
        assert!((quarter + 230.0).abs() < 1e-3);

        marquee.tick(1000.0);
        assert!((marquee.offset() - quarter).abs() < 1e-3);
        assert_eq!(marquee.transform_css(), "translateX(-230.00px)");
    }
}
