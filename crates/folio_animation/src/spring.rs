//! Spring physics
//!
//! Damped harmonic oscillator integrated with fourth-order Runge-Kutta.
//! Large frame deltas are split into fixed sub-steps so stiff springs stay
//! stable when a frame is dropped.

use serde::{Deserialize, Serialize};

/// Largest integration step in seconds
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Displacement and velocity below which a spring snaps to its target
pub const REST_EPSILON: f32 = 0.001;

/// Spring parameters. `stiffness` is the tension constant and `damping` the
/// friction constant, in the same units as react-spring style configs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
}

fn default_mass() -> f32 {
    1.0
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Critically damped, general purpose
    pub const fn standard() -> Self {
        Self::new(170.0, 26.0, 1.0)
    }

    /// Fast with no visible overshoot
    pub const fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Follows a pointer closely
    pub const fn snappy() -> Self {
        Self::new(800.0, 50.0, 1.0)
    }

    /// Slow ease used for color transitions
    pub const fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Visible bounce
    pub const fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Damping ratio; 1.0 is critical
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// A single animated scalar
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Create a spring resting at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget the spring. Current velocity is kept, so an interrupted
    /// animation bends toward the new target instead of restarting.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }

    /// Jump to `value` and rest there
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }
        if dt <= 0.0 {
            return;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            self.rk4(h);
            remaining -= h;
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (-stiffness * (x - self.target) - damping * v) / mass.max(f32::EPSILON)
    }

    fn rk4(&mut self, h: f32) {
        let x0 = self.value;
        let v0 = self.velocity;

        let k1x = v0;
        let k1v = self.acceleration(x0, v0);

        let k2x = v0 + 0.5 * h * k1v;
        let k2v = self.acceleration(x0 + 0.5 * h * k1x, k2x);

        let k3x = v0 + 0.5 * h * k2v;
        let k3v = self.acceleration(x0 + 0.5 * h * k2x, k3x);

        let k4x = v0 + h * k3v;
        let k4v = self.acceleration(x0 + h * k3x, k4x);

        self.value = x0 + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v0 + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}
