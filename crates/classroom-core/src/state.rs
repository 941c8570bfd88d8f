//! Agent State
//!
//! Mutable scalars of an agent. Every write is clamped to [0, 1].

use std::fmt;

/// A scalar kept in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Level(f32);

impl Level {
    pub fn new(value: f32) -> Self {
        Self(clamp_unit(value))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    pub fn set(&mut self, value: f32) {
        self.0 = clamp_unit(value);
    }

    pub fn adjust(&mut self, delta: f32) {
        self.set(self.0 + delta);
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Clamp to [0, 1]; NaN collapses to 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Happiness, motivation and attention of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentState {
    pub happiness: Level,
    pub motivation: Level,
    pub attention: Level,
}

impl AgentState {
    pub fn new(happiness: f32, motivation: f32) -> Self {
        Self {
            happiness: Level::new(happiness),
            motivation: Level::new(motivation),
            attention: Level::default(),
        }
    }
}
