//! Entity-Component-System implementation
//!
//! Entities own a heterogeneous set of components keyed by a stable type
//! identifier. The [`World`] owns every entity, defers structural changes to
//! the start of the next tick, caches signature queries per tick and runs
//! [`System`]s sequentially in priority order.

pub mod world;
pub mod entity;
pub mod component;
pub mod system;
pub mod query;
pub mod storage;
pub mod scheduler;
pub mod error;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::World;
pub use entity::{Entity, EntityId};
pub use component::{Component, ComponentRegistry, ComponentTypeId, ParentLink};
pub use system::{EntityAccessor, System};
pub use query::{ComponentSet, EntityQuery, QueryCache, QueryStats, Signature};
pub use storage::{Commands, EntityStorage, FlushReport};
pub use scheduler::{SystemId, SystemScheduler};
pub use error::EcsError;
pub use components::{Lifetime, MovementComponent, TransformComponent};
pub use systems::{LifetimeSystem, MovementSystem};
