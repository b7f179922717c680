//! Folio Animation System
//!
//! Spring physics, easing curves and looping timelines.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Scheduler**: Owns springs by id and steps them on a fixed logical clock
//! - **Timelines**: Offset/duration entries with easing, optionally looping forever
//! - **Interruptible**: Retargeting a spring keeps its current velocity

pub mod easing;
pub mod scheduler;
pub mod spring;
pub mod timeline;

pub use easing::Easing;
pub use scheduler::{AnimationScheduler, SpringId};
pub use spring::{Spring, SpringConfig};
pub use timeline::{Timeline, TimelineEntryId};
