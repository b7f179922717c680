//! One-shot visibility reveal
//!
//! A [`RevealTracker`] flips to revealed the first time its target's visible
//! fraction reaches the threshold, then stops observing for good. The
//! [`RevealObserver`] holds one tracker per observed element.

use crate::tree::NodeId;
use folio_core::{Rect, Viewport};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct RevealId;
}

/// Fraction of `bounds` inside the viewport, 0.0 to 1.0
///
/// A zero-area target counts as fully visible while its origin is on screen.
pub fn visible_fraction(bounds: Rect, viewport: &Viewport) -> f32 {
    let visible = viewport.visible_rect();
    let area = bounds.size.area();
    if area <= 0.0 {
        return if visible.contains(bounds.origin) { 1.0 } else { 0.0 };
    }
    match bounds.intersection(&visible) {
        Some(overlap) => (overlap.size.area() / area).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Monotonic reveal flag for a single region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealTracker {
    threshold: f32,
    revealed: bool,
}

impl RevealTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            revealed: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Still waiting for the first crossing
    pub fn is_observing(&self) -> bool {
        !self.revealed
    }

    /// Feed a visible fraction. Returns true only on the flip.
    pub fn update(&mut self, fraction: f32) -> bool {
        if self.revealed {
            return false;
        }
        if fraction > 0.0 && fraction >= self.threshold {
            self.revealed = true;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug)]
struct Observation {
    target: NodeId,
    tracker: RevealTracker,
    observing: bool,
}

/// Reveal trackers keyed by observed element
#[derive(Clone, Debug, Default)]
pub struct RevealObserver {
    observations: SlotMap<RevealId, Observation>,
}

impl RevealObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `target`
    pub fn observe(&mut self, target: NodeId, threshold: f32) -> RevealId {
        self.observations.insert(Observation {
            target,
            tracker: RevealTracker::new(threshold),
            observing: true,
        })
    }

    /// Stop watching. The flag keeps whatever value it had.
    pub fn unobserve(&mut self, id: RevealId) {
        if let Some(observation) = self.observations.get_mut(id) {
            observation.observing = false;
        }
    }

    /// Detach every observation (unmount)
    pub fn disconnect(&mut self) {
        self.observations.clear();
    }

    pub fn target(&self, id: RevealId) -> Option<NodeId> {
        self.observations.get(id).map(|o| o.target)
    }

    pub fn is_revealed(&self, id: RevealId) -> bool {
        self.observations
            .get(id)
            .is_some_and(|o| o.tracker.is_revealed())
    }

    pub fn is_observing(&self, id: RevealId) -> bool {
        self.observations.get(id).is_some_and(|o| o.observing)
    }

    /// Number of observations still waiting
    pub fn observing_count(&self) -> usize {
        self.observations.values().filter(|o| o.observing).count()
    }

    /// Check every observed target against the viewport.
    ///
    /// Targets `bounds_of` cannot resolve are skipped. Returns the ids that
    /// flipped during this call; those are unobserved immediately.
    pub fn update<F>(&mut self, viewport: &Viewport, bounds_of: F) -> Vec<RevealId>
    where
        F: Fn(NodeId) -> Option<Rect>,
    {
        let mut flipped = Vec::new();
        for (id, observation) in self.observations.iter_mut() {
            if !observation.observing {
                continue;
            }
            let Some(bounds) = bounds_of(observation.target) else {
                tracing::trace!("reveal target unresolved, skipping");
                continue;
            };
            if observation.tracker.update(visible_fraction(bounds, viewport)) {
                observation.observing = false;
                flipped.push(id);
            }
        }
        if !flipped.is_empty() {
            tracing::debug!(count = flipped.len(), "sections revealed");
        }
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementTree;

    #[test]
    fn test_visible_fraction() {
        let viewport = Viewport::new(1000.0, 800.0);
        assert_eq!(visible_fraction(Rect::new(0.0, 0.0, 100.0, 100.0), &viewport), 1.0);
        assert_eq!(visible_fraction(Rect::new(0.0, 1000.0, 100.0, 100.0), &viewport), 0.0);
        let half = visible_fraction(Rect::new(0.0, 700.0, 100.0, 200.0), &viewport);
        assert!((half - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tracker_is_monotonic() {
        let mut tracker = RevealTracker::new(0.2);
        assert!(!tracker.update(0.1));
        assert!(tracker.update(0.25));
        for fraction in [0.0, 1.0, 0.0, 0.05] {
            assert!(!tracker.update(fraction));
            assert!(tracker.is_revealed());
        }
        assert!(!tracker.is_observing());
    }

    #[test]
    fn test_observer_skips_unresolved_and_stops_after_flip() {
        let mut tree = ElementTree::new();
        let section = tree.create_element("section");
        let ghost = tree.create_element("section");
        tree.set_bounds(section, Rect::new(0.0, 900.0, 1000.0, 400.0));

        let mut observer = RevealObserver::new();
        let shown = observer.observe(section, 0.2);
        let missing = observer.observe(ghost, 0.1);

        let top = Viewport::new(1000.0, 800.0);
        assert!(observer.update(&top, |n| tree.bounds(n)).is_empty());

        let scrolled = top.with_scroll(300.0);
        assert_eq!(observer.update(&scrolled, |n| tree.bounds(n)), vec![shown]);
        assert!(observer.is_revealed(shown));
        assert!(!observer.is_observing(shown));
        assert!(observer.is_observing(missing));

        assert!(observer.update(&top, |n| tree.bounds(n)).is_empty());
        assert!(observer.is_revealed(shown));
    }

    #[test]
    fn test_disconnect_forgets_everything() {
        let mut tree = ElementTree::new();
        let section = tree.create_element("section");
        tree.set_bounds(section, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut observer = RevealObserver::new();
        let id = observer.observe(section, 0.1);
        observer.disconnect();
        assert!(observer
            .update(&Viewport::default(), |n| tree.bounds(n))
            .is_empty());
        assert!(!observer.is_revealed(id));
        assert_eq!(observer.observing_count(), 0);
    }
}
