//! System trait and the accessor systems run against

use std::rc::Rc;

use super::entity::{Entity, EntityId};
use super::query::Signature;
use super::storage::Commands;

/// Restricted world view handed to systems
///
/// Structural changes made through it are deferred to the next tick, and
/// [`EntityAccessor::query`] answers from the per-tick cache, so every system
/// in a tick observes the same entity set. Attaching or detaching components
/// is structural too: systems queue it on [`Commands`] instead of calling
/// [`Entity::add_component`] directly.
pub trait EntityAccessor {
    /// Queue an entity for registration at the next flush
    fn add_entity(&mut self, entity: Entity) -> EntityId;

    /// Queue an entity for removal at the next flush
    fn remove_entity(&mut self, id: EntityId);

    /// Registered entities matching `signature`, cached for the current tick
    fn query(&mut self, signature: &Signature) -> Rc<[EntityId]>;

    /// Registered entities matching `signature`, rescanned on every call
    fn entity_ids_with(&self, signature: &Signature) -> Vec<EntityId>;

    /// Look up an entity
    fn entity(&self, id: EntityId) -> Option<&Entity>;

    /// Look up an entity mutably
    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity>;

    /// A registered entity together with the deferred command queue
    fn entity_and_commands(&mut self, id: EntityId) -> Option<(&mut Entity, &mut Commands)>;

    /// The deferred command queue
    fn commands(&mut self) -> &mut Commands;

    /// Current tick stamp
    fn tick(&self) -> u64;
}

/// Logic unit run once per tick over the entities matching its signature
///
/// Most systems only implement [`System::signature`] and
/// [`System::process_entity`]; the default [`System::update`] walks the
/// cached query and skips inactive entities. Systems that need to look at
/// several entities at once override `update` instead.
pub trait System {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Components an entity must carry to be processed
    fn signature(&self) -> &Signature;

    /// Lower runs first
    fn priority(&self) -> i32 {
        0
    }

    /// Run the system for one tick
    fn update(&mut self, delta_time: f32, world: &mut dyn EntityAccessor) {
        let entities = world.query(self.signature());
        for &id in entities.iter() {
            let Some((entity, commands)) = world.entity_and_commands(id) else {
                continue;
            };
            if entity.is_active() {
                self.process_entity(delta_time, entity, commands);
            }
        }
    }

    /// Per-entity logic used by the default [`System::update`]
    ///
    /// Component values may be changed in place; attaching or detaching
    /// components goes through `commands`.
    fn process_entity(&mut self, _delta_time: f32, _entity: &mut Entity, _commands: &mut Commands) {}
}
