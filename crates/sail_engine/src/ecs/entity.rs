//! Entity implementation

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::component::{Component, ComponentTypeId, ErasedComponent};
use super::query::Signature;

/// Next identifier handed out by [`Entity::new`]; identifiers are never reused
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Raw identifier value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An identity plus at most one component per component type and a set of tags
///
/// Entities are created free-standing and handed to [`crate::ecs::World::add_entity`],
/// which takes ownership.
pub struct Entity {
    id: EntityId,
    components: HashMap<ComponentTypeId, Box<dyn ErasedComponent>>,
    tags: HashSet<String>,
    active: bool,
}

impl Entity {
    /// Create a new, active entity with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed)),
            components: HashMap::new(),
            tags: HashSet::new(),
            active: true,
        }
    }
    
    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Inactive entities stay registered but are skipped by system processing
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the active flag
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Attach a component, replacing (and detaching) any previous component of the same type
    ///
    /// Returns whether a component was replaced. On a registered entity this
    /// takes effect immediately; systems use [`super::Commands::add_component`]
    /// so the change is only seen from the next tick.
    pub fn add_component<T: Component>(&mut self, mut component: T) -> bool {
        component.on_attach(self.id);
        match self.components.insert(T::TYPE_ID, Box::new(component)) {
            Some(mut previous) => {
                previous.detach();
                true
            }
            None => false,
        }
    }

    /// Builder form of [`Entity::add_component`]
    #[must_use]
    pub fn with_component<T: Component>(mut self, component: T) -> Self {
        self.add_component(component);
        self
    }

    /// Get a component, or `None` if this entity has none of that type
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        let stored = self.components.get(T::TYPE_ID)?;
        let component = stored.as_any().downcast_ref::<T>();
        if component.is_none() {
            log::warn!(
                "Entity {} stores '{}' as {}, not {}",
                self.id, T::TYPE_ID, stored.type_name(), std::any::type_name::<T>()
            );
        }
        component
    }

    /// Get a mutable component, or `None` if this entity has none of that type
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let id = self.id;
        let stored = self.components.get_mut(T::TYPE_ID)?;
        let type_name = stored.type_name();
        let component = stored.as_any_mut().downcast_mut::<T>();
        if component.is_none() {
            log::warn!(
                "Entity {} stores '{}' as {}, not {}",
                id, T::TYPE_ID, type_name, std::any::type_name::<T>()
            );
        }
        component
    }

    /// Detach a component; returns whether one was removed
    pub fn remove_component<T: Component>(&mut self) -> bool {
        self.remove_component_by_id(T::TYPE_ID)
    }

    /// Detach whatever component is stored under `id`; returns whether one was removed
    pub fn remove_component_by_id(&mut self, id: &str) -> bool {
        match self.components.remove(id) {
            Some(mut component) => {
                component.detach();
                true
            }
            None => false,
        }
    }

    /// Detach a component and hand it back to the caller
    pub fn take_component<T: Component>(&mut self) -> Option<T> {
        if self.get_component::<T>().is_none() {
            return None;
        }
        let mut component = self.components.remove(T::TYPE_ID)?;
        component.detach();
        component.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Check if the entity has a component of type `T`
    pub fn has_component<T: Component>(&self) -> bool {
        self.components.contains_key(T::TYPE_ID)
    }

    /// Check if the entity has a component stored under `id`
    pub fn has_component_id(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Whether every component in `signature` is present
    pub fn has_signature(&self, signature: &Signature) -> bool {
        signature.ids().all(|id| self.components.contains_key(id))
    }

    /// Identifiers of all attached components (unordered)
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.components.keys().copied()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Add a tag
    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder form of [`Entity::add_tag`]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag(tag);
        self
    }

    /// Check for a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Remove a tag; returns whether it was present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    /// All tags (unordered)
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components: Vec<_> = self.component_ids().collect();
        components.sort_unstable();
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("components", &components)
            .field("tags", &self.tags)
            .finish()
    }
}
