//! ECS World implementation

use std::rc::Rc;

use super::component::{Component, ComponentRegistry};
use super::entity::{Entity, EntityId};
use super::error::EcsError;
use super::query::{QueryCache, QueryStats, Signature};
use super::scheduler::{SystemId, SystemScheduler};
use super::storage::{Commands, EntityStorage};
use super::system::{EntityAccessor, System};

/// ECS World containing all entities and systems
///
/// Entity additions and removals are queued and applied at the start of the
/// next [`World::update`], which also advances the tick stamp used by the
/// query cache. Between two updates the registered entity set never changes.
pub struct World {
    storage: EntityStorage,
    commands: Commands,
    queries: QueryCache,
    scheduler: SystemScheduler,
    components: ComponentRegistry,
    tick: u64,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            storage: EntityStorage::new(),
            commands: Commands::new(),
            queries: QueryCache::new(),
            scheduler: SystemScheduler::new(),
            components: ComponentRegistry::new(),
            tick: 0,
        }
    }

    /// Declare a component type, failing if its identifier is taken by another type
    pub fn register_component<T: Component>(&mut self) -> Result<(), EcsError> {
        self.components.register::<T>()
    }

    /// Component types declared so far
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }
    
    /// Queue an entity for insertion; it becomes visible to queries after the next update
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        self.commands.add_entity(entity)
    }

    /// Queue an entity for removal; it stays queryable until the next update
    pub fn remove_entity(&mut self, id: EntityId) {
        self.commands.remove_entity(id);
    }

    /// Look up an entity, including ones still waiting to be registered
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.storage.get(id).or_else(|| self.commands.pending_entity(id))
    }

    /// Look up an entity mutably, including ones still waiting to be registered
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.storage.get_mut(id) {
            Some(entity) => Some(entity),
            None => self.commands.pending_entity_mut(id),
        }
    }

    /// Whether `id` is registered (pending additions do not count)
    pub fn contains(&self, id: EntityId) -> bool {
        self.storage.contains(id)
    }

    /// Registered entities whose components include `signature`, in registration order
    pub fn entities_with<'a>(&'a self, signature: &'a Signature) -> impl Iterator<Item = &'a Entity> + 'a {
        self.storage.iter().filter(move |entity| entity.has_signature(signature))
    }

    /// Registered entities carrying `tag`
    pub fn entities_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.storage.iter().filter(move |entity| entity.has_tag(tag))
    }

    /// Registered entities matching `signature`, computed at most once per tick
    pub fn query(&mut self, signature: &Signature) -> Rc<[EntityId]> {
        self.queries.get(signature, &self.storage, self.tick)
    }

    /// Query cache counters
    pub fn query_stats(&self) -> QueryStats {
        self.queries.stats()
    }

    /// Register a system
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> SystemId {
        self.scheduler.add(system)
    }

    /// Change a system's priority; takes effect at the next update
    pub fn set_system_priority(&mut self, id: SystemId, priority: i32) -> Result<(), EcsError> {
        self.scheduler.set_priority(id, priority)
    }

    /// Unregister a system
    pub fn remove_system(&mut self, id: SystemId) -> Option<Box<dyn System>> {
        self.scheduler.remove(id)
    }

    /// System ids in execution order as of the last update
    pub fn system_order(&self) -> Vec<SystemId> {
        self.scheduler.order()
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.scheduler.len()
    }
    
    /// Update the world: flush deferred changes, advance the tick, run systems
    pub fn update(&mut self, delta_time: f32) {
        self.flush();
        self.tick += 1;

        // Systems borrow the world as their accessor while they run
        let mut scheduler = std::mem::take(&mut self.scheduler);
        scheduler.run(delta_time, self);
        self.scheduler = scheduler;
    }

    fn flush(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let report = self.commands.apply(&mut self.storage);
        log::debug!(
            "Tick {}: flushed {} added, {} component changes, {} removed, {} registered",
            self.tick + 1, report.added, report.component_changes, report.removed, self.storage.len()
        );
    }

    /// Current tick stamp; zero until the first update
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.storage.len()
    }

    /// Number of queued structural changes
    pub fn pending_count(&self) -> usize {
        self.commands.len()
    }
    
    /// Get an iterator over all registered entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.storage.iter()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityAccessor for World {
    fn add_entity(&mut self, entity: Entity) -> EntityId {
        World::add_entity(self, entity)
    }

    fn remove_entity(&mut self, id: EntityId) {
        World::remove_entity(self, id);
    }

    fn query(&mut self, signature: &Signature) -> Rc<[EntityId]> {
        World::query(self, signature)
    }

    fn entity_ids_with(&self, signature: &Signature) -> Vec<EntityId> {
        self.storage.matching(signature)
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        World::entity(self, id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        World::entity_mut(self, id)
    }

    fn entity_and_commands(&mut self, id: EntityId) -> Option<(&mut Entity, &mut Commands)> {
        let entity = self.storage.get_mut(id)?;
        Some((entity, &mut self.commands))
    }

    fn commands(&mut self) -> &mut Commands {
        &mut self.commands
    }

    fn tick(&self) -> u64 {
        self.tick
    }
}
