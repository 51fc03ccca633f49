//! Component signatures and tick-granular query caching
//!
//! A [`Signature`] names the component types an entity must carry. An
//! [`EntityQuery`] remembers the matching entity set together with the tick
//! stamp it was computed at and only rescans storage when the stamp moves.
//! Structural changes are deferred to the flush that starts a tick, so a
//! result stays valid for the whole tick it was computed in.

use std::collections::HashMap;
use std::rc::Rc;

use super::component::{Component, ComponentTypeId};
use super::entity::EntityId;
use super::storage::EntityStorage;

/// Set of component type identifiers, kept sorted and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    ids: Vec<ComponentTypeId>,
}

impl Signature {
    /// Signature matching every entity
    pub fn empty() -> Self {
        Self::default()
    }

    /// Signature built from component types, e.g. `Signature::of::<(Position, Velocity)>()`
    pub fn of<S: ComponentSet>() -> Self {
        Self::from_ids(S::type_ids())
    }

    /// Signature built from raw identifiers
    pub fn from_ids(ids: impl IntoIterator<Item = ComponentTypeId>) -> Self {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Add a component type
    #[must_use]
    pub fn with<T: Component>(self) -> Self {
        self.with_id(T::TYPE_ID)
    }

    /// Add a raw identifier
    #[must_use]
    pub fn with_id(mut self, id: ComponentTypeId) -> Self {
        if let Err(position) = self.ids.binary_search(&id) {
            self.ids.insert(position, id);
        }
        self
    }

    /// Identifiers in sorted order
    pub fn ids(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.ids.iter().copied()
    }

    /// Whether `id` is part of the signature
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|candidate| *candidate == id)
    }

    /// Number of component types
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the signature is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A compile-time list of component types
pub trait ComponentSet {
    /// Identifiers of every type in the set
    fn type_ids() -> Vec<ComponentTypeId>;
}

impl ComponentSet for () {
    fn type_ids() -> Vec<ComponentTypeId> {
        Vec::new()
    }
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn type_ids() -> Vec<ComponentTypeId> {
                vec![$($name::TYPE_ID),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);

/// Cached entity set for one signature
#[derive(Debug, Clone)]
pub struct EntityQuery {
    signature: Signature,
    cached: Rc<[EntityId]>,
    last_tick: Option<u64>,
}

impl EntityQuery {
    /// Create a query that has never been evaluated
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            cached: Rc::from(Vec::new()),
            last_tick: None,
        }
    }

    /// The signature this query matches
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Tick the cached result was computed at
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Matching entities at `tick`, rescanning `storage` only when the stamp changed
    pub fn entities(&mut self, storage: &EntityStorage, tick: u64) -> Rc<[EntityId]> {
        if self.last_tick != Some(tick) {
            self.cached = storage.matching(&self.signature).into();
            self.last_tick = Some(tick);
            log::trace!(
                "Query {:?} recomputed at tick {}: {} entities",
                self.signature.ids, tick, self.cached.len()
            );
        }
        Rc::clone(&self.cached)
    }
}

/// Hit/miss counters for a [`QueryCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that rescanned storage
    pub misses: u64,
}

/// One [`EntityQuery`] per distinct signature
#[derive(Debug, Default)]
pub struct QueryCache {
    queries: HashMap<Signature, EntityQuery>,
    stats: QueryStats,
}

impl QueryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching entities for `signature` at `tick`
    pub fn get(&mut self, signature: &Signature, storage: &EntityStorage, tick: u64) -> Rc<[EntityId]> {
        let query = self
            .queries
            .entry(signature.clone())
            .or_insert_with(|| EntityQuery::new(signature.clone()));
        if query.last_tick() == Some(tick) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        query.entities(storage, tick)
    }

    /// Lookup counters since creation
    pub fn stats(&self) -> QueryStats {
        self.stats
    }

    /// Number of distinct signatures seen
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether no signature has been queried yet
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Entity;

    struct Position;
    impl Component for Position {
        const TYPE_ID: ComponentTypeId = "position";
    }

    struct Velocity;
    impl Component for Velocity {
        const TYPE_ID: ComponentTypeId = "velocity";
    }

    #[test]
    fn test_signature_is_order_independent() {
        assert_eq!(
            Signature::of::<(Position, Velocity)>(),
            Signature::of::<(Velocity, Position)>()
        );
        assert_eq!(Signature::empty().with::<Velocity>().with::<Velocity>().len(), 1);
        assert!(Signature::of::<(Position,)>().contains("position"));
    }

    #[test]
    fn test_query_recomputes_only_on_new_tick() {
        let mut storage = EntityStorage::new();
        let first = Entity::new().with_component(Position);
        let first_id = first.id();
        storage.insert(first);

        let mut query = EntityQuery::new(Signature::of::<(Position,)>());
        assert_eq!(&*query.entities(&storage, 1), &[first_id]);

        // Same tick: a new entity is not observed
        let second = Entity::new().with_component(Position);
        let second_id = second.id();
        storage.insert(second);
        assert_eq!(&*query.entities(&storage, 1), &[first_id]);

        assert_eq!(&*query.entities(&storage, 2), &[first_id, second_id]);
    }

    #[test]
    fn test_cache_counts_hits_and_misses() {
        let mut storage = EntityStorage::new();
        storage.insert(Entity::new().with_component(Position).with_component(Velocity));
        storage.insert(Entity::new().with_component(Position));

        let mut cache = QueryCache::new();
        let moving = Signature::of::<(Position, Velocity)>();
        assert_eq!(cache.get(&moving, &storage, 0).len(), 1);
        assert_eq!(cache.get(&moving, &storage, 0).len(), 1);
        assert_eq!(cache.get(&Signature::of::<(Position,)>(), &storage, 0).len(), 2);
        assert_eq!(cache.stats(), QueryStats { hits: 1, misses: 2 });
        assert_eq!(cache.len(), 2);
    }
}
