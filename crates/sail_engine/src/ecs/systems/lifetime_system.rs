//! Lifetime system for despawning expired entities

use crate::ecs::components::Lifetime;
use crate::ecs::{Commands, Entity, Signature, System};

/// Ages [`Lifetime`] components and queues expired entities for removal
pub struct LifetimeSystem {
    signature: Signature,
}

impl LifetimeSystem {
    /// Create a lifetime system
    pub fn new() -> Self {
        Self {
            signature: Signature::of::<(Lifetime,)>(),
        }
    }
}

impl Default for LifetimeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LifetimeSystem {
    fn name(&self) -> &str {
        "LifetimeSystem"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    // Runs after gameplay systems so an entity gets its full final tick
    fn priority(&self) -> i32 {
        100
    }

    fn process_entity(&mut self, delta_time: f32, entity: &mut Entity, commands: &mut Commands) {
        let id = entity.id();
        let Some(lifetime) = entity.get_component_mut::<Lifetime>() else {
            return;
        };
        lifetime.advance(delta_time);

        if lifetime.is_expired() && !commands.is_removal_pending(id) {
            log::debug!("Entity {} expired after {:.2}s", id, lifetime.age);
            commands.remove_entity(id);
        }
    }
}
