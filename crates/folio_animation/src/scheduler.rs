//! Animation scheduler
//!
//! Owns every active spring and steps them together each frame.

use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct SpringId;
}

/// The animation scheduler that ticks all active springs
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, Spring>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            springs: SlotMap::with_key(),
        }
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringId {
        self.springs.insert(spring)
    }

    /// Shorthand for a spring resting at `initial`
    pub fn spawn(&mut self, config: SpringConfig, initial: f32) -> SpringId {
        self.add_spring(Spring::new(config, initial))
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    /// Current value of a spring, 0.0 for unknown ids
    pub fn value(&self, id: SpringId) -> f32 {
        self.springs.get(id).map(Spring::value).unwrap_or(0.0)
    }

    /// Current target of a spring, 0.0 for unknown ids
    pub fn target(&self, id: SpringId) -> f32 {
        self.springs.get(id).map(Spring::target).unwrap_or(0.0)
    }

    /// Retarget a spring with a new config
    pub fn animate_to(&mut self, id: SpringId, target: f32, config: SpringConfig) {
        if let Some(spring) = self.springs.get_mut(id) {
            spring.set_config(config);
            spring.set_target(target);
        }
    }

    pub fn snap_to(&mut self, id: SpringId, value: f32) {
        if let Some(spring) = self.springs.get_mut(id) {
            spring.snap_to(value);
        }
    }

    /// Step every spring by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }
    }

    /// Check if any springs are still moving
    pub fn has_active_animations(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_ticks_all_springs() {
        let mut scheduler = AnimationScheduler::new();
        let a = scheduler.spawn(SpringConfig::stiff(), 0.0);
        let b = scheduler.spawn(SpringConfig::stiff(), 1.0);
        assert!(!scheduler.has_active_animations());

        scheduler.animate_to(a, 10.0, SpringConfig::stiff());
        scheduler.animate_to(b, 0.5, SpringConfig::gentle());
        assert!(scheduler.has_active_animations());

        for _ in 0..240 {
            scheduler.tick(1.0 / 60.0);
        }
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.value(a), 10.0);
        assert_eq!(scheduler.value(b), 0.5);
        assert_eq!(scheduler.get_spring(b).unwrap().config(), SpringConfig::gentle());
    }
}
