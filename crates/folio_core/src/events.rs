//! Input events and listener bookkeeping
//!
//! Events carry a widget target id and a logical timestamp in milliseconds.
//! Listeners are registered per (target, event type) pair and can be detached
//! individually or all at once when the owning view unmounts.

use slotmap::{new_key_type, SlotMap};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const CLICK: EventType = 8;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;

    /// The OS light/dark preference changed
    pub const COLOR_SCHEME_CHANGE: EventType = 45;

    // Element lifecycle events
    pub const MOUNT: EventType = 60;
    pub const UNMOUNT: EventType = 61;
}

/// A UI event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub target: u64, // Widget ID
    pub data: EventData,
    /// Logical milliseconds since the session started
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Pointer { x: f32, y: f32 },
    /// Absolute document scroll offset after the scroll
    Scroll { scroll_x: f32, scroll_y: f32 },
    Resize { width: f32, height: f32 },
    ColorScheme { dark: bool },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: u64, data: EventData, timestamp: u64) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp,
        }
    }

    pub fn pointer(event_type: EventType, target: u64, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(event_type, target, EventData::Pointer { x, y }, timestamp)
    }

    /// Pointer position, if this is a pointer event
    pub fn pointer_position(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

new_key_type! {
    /// Handle returned when attaching a listener
    pub struct ListenerId;
}

#[derive(Clone, Copy, Debug)]
struct Listener {
    target: u64,
    event_type: EventType,
}

/// Tracks which (target, event type) pairs currently have a live listener.
///
/// Event routing consults the registry before delivering, so an event whose
/// listener was detached is dropped instead of reaching torn-down state.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: SlotMap<ListenerId, Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener for `event_type` on `target`
    pub fn listen(&mut self, target: u64, event_type: EventType) -> ListenerId {
        tracing::trace!(widget = target, event_type, "listener attached");
        self.listeners.insert(Listener { target, event_type })
    }

    /// Detach a single listener. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Detach every listener bound to `target`
    pub fn remove_target(&mut self, target: u64) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|_, l| l.target != target);
        before - self.listeners.len()
    }

    /// Detach everything
    pub fn clear(&mut self) {
        tracing::trace!(count = self.listeners.len(), "listeners cleared");
        self.listeners.clear();
    }

    /// Whether an event of this type on this target would be delivered
    pub fn is_listening(&self, target: u64, event_type: EventType) -> bool {
        self.listeners
            .values()
            .any(|l| l.target == target && l.event_type == event_type)
    }

    /// Whether `event` has a live listener
    pub fn accepts(&self, event: &Event) -> bool {
        self.is_listening(event.target, event.event_type)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::event_types::*;
    use super::*;

    #[test]
    fn test_registry_routes_only_attached_pairs() {
        let mut registry = ListenerRegistry::new();
        registry.listen(0, SCROLL);

        assert!(registry.accepts(&Event::new(
            SCROLL,
            0,
            EventData::Scroll {
                scroll_x: 0.0,
                scroll_y: 20.0
            },
            0
        )));
        assert!(!registry.is_listening(0, RESIZE));
        assert!(!registry.is_listening(7, SCROLL));
    }

    #[test]
    fn test_remove_target_detaches_all_of_its_listeners() {
        let mut registry = ListenerRegistry::new();
        registry.listen(3, POINTER_DOWN);
        registry.listen(3, POINTER_MOVE);
        let keep = registry.listen(4, POINTER_MOVE);

        assert_eq!(registry.remove_target(3), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(keep));
        assert!(!registry.remove(keep));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pointer_position() {
        let ev = Event::pointer(POINTER_MOVE, 1, 4.0, 5.0, 16);
        assert_eq!(ev.pointer_position(), Some((4.0, 5.0)));
        let ev = Event::new(UNMOUNT, 1, EventData::None, 16);
        assert_eq!(ev.pointer_position(), None);
    }
}
