//! Lifetime Component
//!
//! Tracks entity lifetime for automatic despawning by
//! [`crate::ecs::systems::LifetimeSystem`].

use crate::ecs::Component;

/// Lifetime component for entities that should despawn after a duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Time the entity has been alive (in seconds)
    pub age: f32,
    /// How long the entity should live (in seconds, 0 = forever)
    pub duration: f32,
}

impl Component for Lifetime {
    const TYPE_ID: &'static str = "lifetime";
}

impl Lifetime {
    /// Create a new lifetime component
    pub fn new(duration: f32) -> Self {
        Self {
            age: 0.0,
            duration,
        }
    }

    /// Advance the age by `delta_time`
    pub fn advance(&mut self, delta_time: f32) {
        self.age += delta_time;
    }

    /// Check if this entity's lifetime has expired
    pub fn is_expired(&self) -> bool {
        if self.duration <= 0.0 {
            false // Infinite lifetime
        } else {
            self.age >= self.duration
        }
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.duration - self.age).max(0.0)
        }
    }
}
