//! One-shot timers on a logical clock
//!
//! The queue owns its own millisecond clock. Nothing fires until the owner
//! calls [`TimerQueue::advance`], which keeps every deferred action on the
//! same thread as the event handlers that scheduled it.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

#[derive(Debug)]
struct Timer<T> {
    deadline_ms: u64,
    payload: T,
}

/// Fire-once timers keyed by [`TimerId`]
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    now_ms: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now_ms: 0,
        }
    }

    /// Current logical time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `payload` to fire `delay_ms` after the current logical time
    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
        let deadline_ms = self.now_ms.saturating_add(delay_ms);
        self.timers.insert(Timer {
            deadline_ms,
            payload,
        })
    }

    /// Cancel a pending timer, returning its payload
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|t| t.payload)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Advance the clock and drain every timer whose deadline has passed,
    /// earliest deadline first
    pub fn advance(&mut self, dt_ms: u64) -> Vec<T> {
        self.now_ms = self.now_ms.saturating_add(dt_ms);
        let now = self.now_ms;

        let mut due: Vec<(u64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= now)
            .map(|(id, t)| (t.deadline_ms, id))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);

        due.into_iter()
            .filter_map(|(_, id)| self.timers.remove(id))
            .map(|t| t.payload)
            .collect()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.values().map(|t| t.deadline_ms).min()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
