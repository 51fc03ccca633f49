//! Transform component for the ECS system
//! 
//! Pure data: position and heading in canvas space (x right, y down).

use super::Vec2;
use crate::ecs::Component;

/// ECS Transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec2,
    
    /// Heading in radians, zero along +x
    pub rotation: f32,
    
    /// Uniform scale factor
    pub scale: f32,
}

impl Component for TransformComponent {
    const TYPE_ID: &'static str = "transform";
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Create from position and heading
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Unit vector along the current heading
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Move by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_follows_rotation() {
        let transform = TransformComponent::from_position_rotation(Vec2::zeros(), std::f32::consts::FRAC_PI_2);
        let forward = transform.forward();
        assert_relative_eq!(forward.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(forward.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translate() {
        let mut transform = TransformComponent::from_position(Vec2::new(1.0, 2.0));
        transform.translate(Vec2::new(0.5, -1.0));
        assert_eq!(transform.position, Vec2::new(1.5, 1.0));
    }
}
