//! ECS error types

use thiserror::Error;

use super::component::ComponentTypeId;
use super::scheduler::SystemId;

/// Errors raised by world configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Two Rust types claim the same component identifier
    #[error("component id '{id}' is already registered by {existing}, cannot register {incoming}")]
    ComponentIdCollision {
        /// The contested identifier
        id: ComponentTypeId,
        /// Type registered first
        existing: &'static str,
        /// Type that attempted to register
        incoming: &'static str,
    },

    /// No system with this id is registered
    #[error("unknown system {0:?}")]
    UnknownSystem(SystemId),
}
