//! Entity storage and the deferred structural-change queue
//!
//! Entities live in a [`SlotMap`] arena indexed by their [`EntityId`]; a
//! separate list keeps registration order so iteration is deterministic.
//! Additions, removals and component changes requested while systems run
//! go through [`Commands`] and are applied in one batch at the start of the
//! next tick.

use std::collections::HashMap;
use std::fmt;

use slotmap::SlotMap;

use super::component::{Component, ComponentTypeId};
use super::entity::{Entity, EntityId};
use super::query::Signature;

slotmap::new_key_type! {
    /// Arena slot of a registered entity
    pub struct EntityKey;
}

/// Registered entities
#[derive(Debug, Default)]
pub struct EntityStorage {
    slots: SlotMap<EntityKey, Entity>,
    index: HashMap<EntityId, EntityKey>,
    order: Vec<EntityId>,
}

impl EntityStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity; an entity with the same id is replaced
    pub fn insert(&mut self, entity: Entity) {
        let id = entity.id();
        if let Some(&key) = self.index.get(&id) {
            log::warn!("Entity {} registered twice; replacing the earlier instance", id);
            self.slots[key] = entity;
            return;
        }
        let key = self.slots.insert(entity);
        self.index.insert(id, key);
        self.order.push(id);
    }

    /// Unregister an entity and return it
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let key = self.index.remove(&id)?;
        self.order.retain(|registered| *registered != id);
        self.slots.remove(key)
    }

    /// Look up a registered entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).and_then(|&key| self.slots.get(key))
    }

    /// Look up a registered entity mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let key = *self.index.get(&id)?;
        self.slots.get_mut(key)
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Registered entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(move |id| self.get(*id))
    }

    /// Ids of registered entities carrying every component in `signature`, in registration order
    pub fn matching(&self, signature: &Signature) -> Vec<EntityId> {
        self.iter()
            .filter(|entity| entity.has_signature(signature))
            .map(Entity::id)
            .collect()
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Outcome of applying a [`Commands`] batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entities registered
    pub added: usize,
    /// Component attach/detach operations applied
    pub component_changes: usize,
    /// Entities unregistered
    pub removed: usize,
}

/// Queued attach or detach of one component on one entity
struct ComponentChange {
    target: EntityId,
    component: ComponentTypeId,
    attach: bool,
    apply: Box<dyn FnOnce(&mut Entity)>,
}

/// Deferred entity additions, removals and component changes
#[derive(Default)]
pub struct Commands {
    to_add: Vec<Entity>,
    component_changes: Vec<ComponentChange>,
    to_remove: Vec<EntityId>,
}

impl Commands {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entity for registration at the next flush
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.to_add.push(entity);
        id
    }

    /// Queue an entity for removal at the next flush
    pub fn remove_entity(&mut self, id: EntityId) {
        self.to_remove.push(id);
    }

    /// Queue `component` to be attached to entity `id` at the next flush
    ///
    /// Until then queries keep matching the entity's current component set.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) {
        self.component_changes.push(ComponentChange {
            target: id,
            component: T::TYPE_ID,
            attach: true,
            apply: Box::new(move |entity: &mut Entity| {
                entity.add_component(component);
            }),
        });
    }

    /// Queue the component of type `T` to be detached from entity `id` at the next flush
    pub fn remove_component<T: Component>(&mut self, id: EntityId) {
        self.component_changes.push(ComponentChange {
            target: id,
            component: T::TYPE_ID,
            attach: false,
            apply: Box::new(|entity: &mut Entity| {
                entity.remove_component::<T>();
            }),
        });
    }

    /// A queued (not yet registered) entity
    pub fn pending_entity(&self, id: EntityId) -> Option<&Entity> {
        self.to_add.iter().find(|entity| entity.id() == id)
    }

    /// A queued (not yet registered) entity, mutably
    pub fn pending_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.to_add.iter_mut().find(|entity| entity.id() == id)
    }

    /// Whether a removal is queued for `id`
    pub fn is_removal_pending(&self, id: EntityId) -> bool {
        self.to_remove.contains(&id)
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.to_add.len() + self.component_changes.len() + self.to_remove.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.component_changes.is_empty() && self.to_remove.is_empty()
    }

    /// Apply additions, then component changes, then removals, to `storage`
    pub fn apply(&mut self, storage: &mut EntityStorage) -> FlushReport {
        let mut report = FlushReport::default();

        for entity in self.to_add.drain(..) {
            storage.insert(entity);
            report.added += 1;
        }

        for change in self.component_changes.drain(..) {
            match storage.get_mut(change.target) {
                Some(entity) => {
                    (change.apply)(entity);
                    report.component_changes += 1;
                }
                None => log::trace!(
                    "Dropping {} of '{}' for unknown entity {}",
                    if change.attach { "attach" } else { "detach" },
                    change.component,
                    change.target
                ),
            }
        }

        for id in self.to_remove.drain(..) {
            if storage.remove(id).is_some() {
                report.removed += 1;
            } else {
                log::trace!("Ignoring removal of unknown entity {}", id);
            }
        }

        report
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let changes: Vec<_> = self
            .component_changes
            .iter()
            .map(|change| (change.target, change.component, change.attach))
            .collect();
        f.debug_struct("Commands")
            .field("to_add", &self.to_add)
            .field("component_changes", &changes)
            .field("to_remove", &self.to_remove)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_follows_registration_order() {
        let mut storage = EntityStorage::new();
        let ids: Vec<_> = (0..4)
            .map(|_| {
                let entity = Entity::new();
                let id = entity.id();
                storage.insert(entity);
                id
            })
            .collect();

        storage.remove(ids[1]);
        let late = Entity::new();
        let late_id = late.id();
        storage.insert(late);

        let order: Vec<_> = storage.iter().map(Entity::id).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3], late_id]);
        assert_eq!(storage.len(), 4);
    }

    #[test]
    fn test_commands_apply_adds_before_removes() {
        let mut storage = EntityStorage::new();
        let mut commands = Commands::new();

        let id = commands.add_entity(Entity::new());
        commands.remove_entity(id);
        commands.remove_entity(EntityId(u64::MAX));
        assert_eq!(commands.len(), 3);
        assert!(commands.pending_entity(id).is_some());

        let report = commands.apply(&mut storage);
        assert_eq!(report, FlushReport { added: 1, component_changes: 0, removed: 1 });
        assert!(storage.is_empty());
        assert!(commands.is_empty());
    }

    struct Anchor;
    impl Component for Anchor {
        const TYPE_ID: ComponentTypeId = "anchor";
    }

    #[test]
    fn test_component_changes_wait_for_flush() {
        let mut storage = EntityStorage::new();
        let entity = Entity::new();
        let id = entity.id();
        storage.insert(entity);

        let mut commands = Commands::new();
        commands.add_component(id, Anchor);
        commands.add_component(EntityId(u64::MAX), Anchor);
        assert_eq!(commands.len(), 2);
        assert!(!storage.get(id).unwrap().has_component::<Anchor>());

        let report = commands.apply(&mut storage);
        assert_eq!(report.component_changes, 1);
        assert!(storage.get(id).unwrap().has_component::<Anchor>());

        commands.remove_component::<Anchor>(id);
        assert!(storage.get(id).unwrap().has_component::<Anchor>());
        commands.apply(&mut storage);
        assert!(!storage.get(id).unwrap().has_component::<Anchor>());
    }

    #[test]
    fn test_component_change_reaches_entity_added_in_same_flush() {
        let mut storage = EntityStorage::new();
        let mut commands = Commands::new();
        let id = commands.add_entity(Entity::new());
        commands.add_component(id, Anchor);

        let report = commands.apply(&mut storage);
        assert_eq!(report, FlushReport { added: 1, component_changes: 1, removed: 0 });
        assert!(storage.get(id).unwrap().has_component::<Anchor>());
    }
}
