//! Drag gesture tracking
//!
//! Turns raw pointer down/move/up samples into [`GestureFrame`]s: movement
//! since pointer-down, per-axis speed in px/ms and direction of travel.

use folio_core::Point;

/// A release this long after the last move reports zero velocity
pub const STALE_RELEASE_MS: u64 = 100;

/// Snapshot of a drag in progress or just ended
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureFrame {
    /// Displacement from the pointer-down position
    pub movement: Point,
    /// Speed per axis in px/ms, always non-negative
    pub velocity: Point,
    /// Sign of the latest movement per axis: -1, 0 or 1
    pub direction: Point,
    /// Pointer still down
    pub active: bool,
}

impl GestureFrame {
    /// -1 for leftward travel, otherwise 1
    pub fn horizontal_sign(&self) -> f32 {
        if self.direction.x < 0.0 {
            -1.0
        } else {
            1.0
        }
    }
}

/// Tracks one pointer from down to up
#[derive(Clone, Debug, Default)]
pub struct DragTracker {
    origin: Point,
    last: Point,
    last_time_ms: u64,
    velocity: Point,
    direction: Point,
    active: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pointer down at `pos`
    pub fn begin(&mut self, pos: Point, time_ms: u64) -> GestureFrame {
        *self = Self {
            origin: pos,
            last: pos,
            last_time_ms: time_ms,
            velocity: Point::default(),
            direction: Point::default(),
            active: true,
        };
        self.frame(pos)
    }

    /// Pointer moved while down
    pub fn update(&mut self, pos: Point, time_ms: u64) -> GestureFrame {
        if !self.active {
            return self.frame(self.last);
        }
        self.sample(pos, time_ms);
        self.frame(pos)
    }

    /// Pointer released at `pos`
    pub fn end(&mut self, pos: Point, time_ms: u64) -> GestureFrame {
        if !self.active {
            return self.frame(self.last);
        }
        if pos != self.last {
            self.sample(pos, time_ms);
        } else if time_ms.saturating_sub(self.last_time_ms) > STALE_RELEASE_MS {
            self.velocity = Point::default();
        }
        self.active = false;
        self.frame(pos)
    }

    /// Abandon the drag without a release frame
    pub fn cancel(&mut self) {
        self.active = false;
    }

    fn sample(&mut self, pos: Point, time_ms: u64) {
        let dx = pos.x - self.last.x;
        let dy = pos.y - self.last.y;
        let dt = time_ms.saturating_sub(self.last_time_ms);

        if dt > STALE_RELEASE_MS {
            self.velocity = Point::default();
        } else if dt > 0 {
            self.velocity = Point::new(dx.abs() / dt as f32, dy.abs() / dt as f32);
        }
        if dx != 0.0 {
            self.direction.x = dx.signum();
        }
        if dy != 0.0 {
            self.direction.y = dy.signum();
        }

        self.last = pos;
        self.last_time_ms = time_ms;
    }

    fn frame(&self, pos: Point) -> GestureFrame {
        GestureFrame {
            movement: Point::new(pos.x - self.origin.x, pos.y - self.origin.y),
            velocity: self.velocity,
            direction: self.direction,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_from_last_move() {
        let mut drag = DragTracker::new();
        drag.begin(Point::new(100.0, 50.0), 0);
        drag.update(Point::new(110.0, 50.0), 16);
        let frame = drag.update(Point::new(118.0, 52.0), 32);
        assert!(frame.active);
        assert_eq!(frame.movement, Point::new(18.0, 2.0));
        assert!((frame.velocity.x - 0.5).abs() < 1e-6);
        assert_eq!(frame.horizontal_sign(), 1.0);
    }

    #[test]
    fn test_stale_release_has_zero_velocity() {
        let mut drag = DragTracker::new();
        drag.begin(Point::new(0.0, 0.0), 0);
        drag.update(Point::new(40.0, 0.0), 10);
        let frame = drag.end(Point::new(40.0, 0.0), 10 + STALE_RELEASE_MS + 1);
        assert!(!frame.active);
        assert_eq!(frame.velocity, Point::default());
        assert_eq!(frame.movement.x, 40.0);
    }

    #[test]
    fn test_fresh_release_keeps_velocity() {
        let mut drag = DragTracker::new();
        drag.begin(Point::new(0.0, 0.0), 0);
        drag.update(Point::new(-20.0, 0.0), 20);
        let frame = drag.end(Point::new(-20.0, 0.0), 40);
        assert!((frame.velocity.x - 1.0).abs() < 1e-6);
        assert_eq!(frame.horizontal_sign(), -1.0);
    }

    #[test]
    fn test_direction_follows_last_movement() {
        let mut drag = DragTracker::new();
        drag.begin(Point::new(0.0, 0.0), 0);
        drag.update(Point::new(50.0, 0.0), 16);
        let frame = drag.update(Point::new(45.0, 0.0), 32);
        assert_eq!(frame.movement.x, 45.0);
        assert_eq!(frame.direction.x, -1.0);
    }

    #[test]
    fn test_samples_after_end_are_ignored() {
        let mut drag = DragTracker::new();
        drag.begin(Point::new(0.0, 0.0), 0);
        drag.end(Point::new(5.0, 0.0), 8);
        let frame = drag.update(Point::new(500.0, 0.0), 16);
        assert!(!frame.active);
        assert_eq!(frame.movement.x, 5.0);
    }
}
