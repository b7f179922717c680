//! Timeline orchestration for time-based animations
//!
//! Entries are linear ranges placed at an offset inside the timeline. A
//! looping timeline carries leftover time across the loop point, so a
//! constant-speed entry never stutters when it wraps.

use crate::easing::Easing;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimelineEntryId;
}

/// Loop forever
pub const LOOP_INFINITE: i32 = -1;

/// An entry in a timeline
#[derive(Debug, Clone)]
struct TimelineEntry {
    /// Offset in milliseconds from timeline start
    offset_ms: i32,
    duration_ms: u32,
    start_value: f32,
    end_value: f32,
    easing: Easing,
}

/// A timeline that orchestrates multiple animations
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, TimelineEntry>,
    current_time: f32,
    duration_ms: u32,
    playing: bool,
    loop_count: i32,
    current_loop: i32,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            current_time: 0.0,
            duration_ms: 0,
            playing: false,
            loop_count: 1,
            current_loop: 0,
        }
    }

    /// Add a linear animation to the timeline at a given offset
    pub fn add(
        &mut self,
        offset_ms: i32,
        duration_ms: u32,
        start_value: f32,
        end_value: f32,
    ) -> TimelineEntryId {
        self.add_eased(offset_ms, duration_ms, start_value, end_value, Easing::Linear)
    }

    /// Add an eased animation to the timeline at a given offset
    pub fn add_eased(
        &mut self,
        offset_ms: i32,
        duration_ms: u32,
        start_value: f32,
        end_value: f32,
        easing: Easing,
    ) -> TimelineEntryId {
        let id = self.entries.insert(TimelineEntry {
            offset_ms,
            duration_ms,
            start_value,
            end_value,
            easing,
        });

        let end_time = (offset_ms.max(0) as u32) + duration_ms;
        self.duration_ms = self.duration_ms.max(end_time);

        id
    }

    pub fn start(&mut self) {
        self.current_time = 0.0;
        self.current_loop = 0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Number of plays, or [`LOOP_INFINITE`]
    pub fn set_loop(&mut self, count: i32) {
        self.loop_count = count;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Time within the current loop
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Advance the timeline
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }
        if self.duration_ms == 0 {
            self.playing = false;
            return;
        }

        self.current_time += dt_ms;
        let duration = self.duration_ms as f32;

        while self.current_time >= duration {
            let more_loops =
                self.loop_count == LOOP_INFINITE || self.current_loop < self.loop_count - 1;
            if !more_loops {
                self.current_time = duration;
                self.playing = false;
                tracing::trace!(loops = self.current_loop + 1, "timeline finished");
                break;
            }
            self.current_time -= duration;
            self.current_loop += 1;
            tracing::trace!(
                loop_index = self.current_loop,
                carry_ms = self.current_time,
                "timeline wrapped"
            );
        }
    }

    /// Get the current value for an animation entry
    pub fn value(&self, id: TimelineEntryId) -> Option<f32> {
        let entry = self.entries.get(id)?;

        let local_time = self.current_time - entry.offset_ms as f32;

        if local_time < 0.0 {
            return Some(entry.start_value);
        }

        if local_time >= entry.duration_ms as f32 {
            return Some(entry.end_value);
        }

        let progress = entry.easing.apply(local_time / entry.duration_ms as f32);
        Some(entry.start_value + (entry.end_value - entry.start_value) * progress)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_play_clamps_at_end() {
        let mut tl = Timeline::new();
        let id = tl.add(0, 100, 0.0, 10.0);
        tl.start();
        tl.tick(50.0);
        assert_eq!(tl.value(id), Some(5.0));
        tl.tick(500.0);
        assert_eq!(tl.value(id), Some(10.0));
        assert!(!tl.is_playing());
    }

    #[test]
    fn test_infinite_loop_carries_remainder() {
        let mut tl = Timeline::new();
        let id = tl.add(0, 1000, 0.0, -100.0);
        tl.set_loop(LOOP_INFINITE);
        tl.start();

        tl.tick(2250.0);
        assert!(tl.is_playing());
        assert!((tl.current_time() - 250.0).abs() < 1e-3);
        assert!((tl.value(id).unwrap() + 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_offset_entry_holds_start_value() {
        let mut tl = Timeline::new();
        let late = tl.add(200, 100, 1.0, 2.0);
        tl.start();
        tl.tick(100.0);
        assert_eq!(tl.value(late), Some(1.0));
        assert_eq!(tl.duration_ms(), 300);
    }

    #[test]
    fn test_counted_loops_stop() {
        let mut tl = Timeline::new();
        tl.add(0, 10, 0.0, 1.0);
        tl.set_loop(2);
        tl.start();
        tl.tick(15.0);
        assert!(tl.is_playing());
        tl.tick(10.0);
        assert!(!tl.is_playing());
    }

    #[test]
    fn test_eased_entry_samples_its_curve() {
        let mut tl = Timeline::new();
        let fade = tl.add_eased(0, 300, 0.0, 1.0, Easing::Ease);
        tl.start();
        tl.tick(150.0);
        let mid = tl.value(fade).unwrap();
        assert!((mid - Easing::Ease.apply(0.5)).abs() < 1e-4);
        assert!(mid > 0.5);
        tl.tick(150.0);
        assert_eq!(tl.value(fade), Some(1.0));
        assert!(!tl.is_playing());
    }
}
