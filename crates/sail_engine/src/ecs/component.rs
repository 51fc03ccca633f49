//! Component trait and type identity
//!
//! Every component type carries a stable string identifier as an associated
//! constant. Entities key their component maps by that identifier, so two
//! Rust types must never share one; [`ComponentRegistry`] turns such a
//! collision into a construction-time error.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::entity::EntityId;
use super::EcsError;

/// Stable identifier shared by every instance of a component type
pub type ComponentTypeId = &'static str;

/// Data attached to an entity
///
/// # Example
///
/// ```
/// use sail_engine::ecs::Component;
///
/// struct Health(u32);
///
/// impl Component for Health {
///     const TYPE_ID: &'static str = "health";
/// }
/// ```
pub trait Component: Any {
    /// Identifier of this component type
    const TYPE_ID: ComponentTypeId;

    /// Called when the component is attached to `owner`
    fn on_attach(&mut self, _owner: EntityId) {}

    /// Called when the component is detached from its owner
    fn on_detach(&mut self) {}
}

/// Non-owning back-reference from a component to the entity holding it
///
/// Embed this in a component and forward [`Component::on_attach`] /
/// [`Component::on_detach`] to [`ParentLink::attach`] / [`ParentLink::detach`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParentLink(Option<EntityId>);

impl ParentLink {
    /// Record the owning entity
    pub fn attach(&mut self, owner: EntityId) {
        self.0 = Some(owner);
    }

    /// Clear the back-reference
    pub fn detach(&mut self) {
        self.0 = None;
    }

    /// The owning entity, if attached
    pub fn get(&self) -> Option<EntityId> {
        self.0
    }
}

/// Object-safe view of a stored component
pub(crate) trait ErasedComponent: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn detach(&mut self);
    fn type_name(&self) -> &'static str;
}

impl<T: Component> ErasedComponent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn detach(&mut self) {
        self.on_detach();
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

#[derive(Debug, Clone, Copy)]
struct RegisteredType {
    type_id: TypeId,
    type_name: &'static str,
}

/// Registry of component identifiers known to a world
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    types: HashMap<ComponentTypeId, RegisteredType>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its identifier
    ///
    /// Registering the same type twice is a no-op. Registering a different
    /// type under an identifier already taken is an error.
    pub fn register<T: Component>(&mut self) -> Result<(), EcsError> {
        let incoming = RegisteredType {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        };
        match self.types.get(T::TYPE_ID) {
            Some(existing) if existing.type_id == incoming.type_id => Ok(()),
            Some(existing) => Err(EcsError::ComponentIdCollision {
                id: T::TYPE_ID,
                existing: existing.type_name,
                incoming: incoming.type_name,
            }),
            None => {
                log::trace!("Registered component '{}' as {}", T::TYPE_ID, incoming.type_name);
                self.types.insert(T::TYPE_ID, incoming);
                Ok(())
            }
        }
    }

    /// Whether `id` has been registered
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Rust type name registered for `id`
    pub fn type_name(&self, id: &str) -> Option<&'static str> {
        self.types.get(id).map(|registered| registered.type_name)
    }

    /// Number of registered component types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no component type has been registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {
        const TYPE_ID: ComponentTypeId = "position";
    }

    struct Impostor;
    impl Component for Impostor {
        const TYPE_ID: ComponentTypeId = "position";
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Position>().unwrap();
        registry.register::<Position>().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("position"));
    }

    #[test]
    fn test_collision_is_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Position>().unwrap();
        let err = registry.register::<Impostor>().unwrap_err();
        match err {
            EcsError::ComponentIdCollision { id, existing, incoming } => {
                assert_eq!(id, "position");
                assert!(existing.ends_with("Position"));
                assert!(incoming.ends_with("Impostor"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parent_link() {
        let mut link = ParentLink::default();
        assert_eq!(link.get(), None);
        link.attach(EntityId(7));
        assert_eq!(link.get(), Some(EntityId(7)));
        link.detach();
        assert_eq!(link.get(), None);
    }
}
