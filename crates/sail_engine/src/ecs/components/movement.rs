//! Movement component for entities that move in 2D space

use super::Vec2;
use crate::ecs::Component;

/// Component for entities that can move
#[derive(Debug, Clone, PartialEq)]
pub struct MovementComponent {
    /// Linear velocity in units per second
    pub velocity: Vec2,
    
    /// Linear acceleration in units per second squared
    pub acceleration: Vec2,
    
    /// Maximum speed limit (0 = no limit)
    pub max_speed: f32,
    
    /// Fraction of velocity lost per second (0 = no friction, 1 = stops within a second)
    pub friction: f32,
    
    /// Whether movement is enabled
    pub enabled: bool,
}

impl Component for MovementComponent {
    const TYPE_ID: &'static str = "movement";
}

impl Default for MovementComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementComponent {
    /// Create a new movement component at rest
    pub fn new() -> Self {
        Self::with_velocity(Vec2::zeros())
    }
    
    /// Create a movement component with initial velocity
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            acceleration: Vec2::zeros(),
            max_speed: 0.0,
            friction: 0.0,
            enabled: true,
        }
    }

    /// Set friction (builder)
    #[must_use]
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    /// Set speed limit (builder)
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed.max(0.0);
        self
    }
    
    /// Add to velocity
    pub fn add_velocity(&mut self, delta_velocity: Vec2) {
        self.velocity += delta_velocity;
    }

    /// Integrate acceleration and friction over `delta_time`, returning the displacement
    pub fn step(&mut self, delta_time: f32) -> Vec2 {
        if !self.enabled {
            return Vec2::zeros();
        }

        self.velocity += self.acceleration * delta_time;
        self.velocity *= (1.0 - self.friction * delta_time).max(0.0);

        if self.max_speed > 0.0 {
            let speed = self.velocity.norm();
            if speed > self.max_speed {
                self.velocity *= self.max_speed / speed;
            }
        }

        self.velocity * delta_time
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}
