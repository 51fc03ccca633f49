//! Movement system integrating velocity into position

use crate::ecs::components::{MovementComponent, TransformComponent};
use crate::ecs::{Commands, Entity, Signature, System};

/// Applies [`MovementComponent`] to [`TransformComponent`] every tick
pub struct MovementSystem {
    signature: Signature,
    priority: i32,
}

impl MovementSystem {
    /// Create a movement system with the default priority
    pub fn new() -> Self {
        Self::with_priority(0)
    }

    /// Create a movement system running at `priority`
    pub fn with_priority(priority: i32) -> Self {
        Self {
            signature: Signature::of::<(TransformComponent, MovementComponent)>(),
            priority,
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "MovementSystem"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn process_entity(&mut self, delta_time: f32, entity: &mut Entity, _commands: &mut Commands) {
        let Some(movement) = entity.get_component_mut::<MovementComponent>() else {
            return;
        };
        let displacement = movement.step(delta_time);

        if let Some(transform) = entity.get_component_mut::<TransformComponent>() {
            transform.translate(displacement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Vec2;
    use crate::ecs::World;
    use approx::assert_relative_eq;

    #[test]
    fn test_moves_matching_active_entities() {
        let mut world = World::new();
        world.add_system(MovementSystem::new());

        let moving = world.add_entity(
            Entity::new()
                .with_component(TransformComponent::default())
                .with_component(MovementComponent::with_velocity(Vec2::new(1.0, 0.0))),
        );
        let parked = world.add_entity(
            Entity::new()
                .with_component(TransformComponent::default())
                .with_component(MovementComponent::with_velocity(Vec2::new(1.0, 0.0))),
        );
        world.entity_mut(parked).unwrap().set_active(false);
        // No movement component: not matched
        let anchored = world.add_entity(Entity::new().with_component(TransformComponent::default()));

        world.update(0.5);
        world.update(0.5);

        let position = |id| world.entity(id).unwrap().get_component::<TransformComponent>().unwrap().position;
        assert_relative_eq!(position(moving).x, 1.0);
        assert_relative_eq!(position(parked).x, 0.0);
        assert_relative_eq!(position(anchored).x, 0.0);
    }
}
