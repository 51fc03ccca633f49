//! # Sail Engine
//!
//! A small frame-driven simulation core for 2D games.
//!
//! ## Features
//!
//! - **ECS Architecture**: entities with typed components, deferred
//!   structural changes, tick-cached queries and priority-ordered systems
//! - **State Machine**: data-driven states with hooks, guarded transitions
//!   and per-state input mappings
//! - **Configuration**: TOML/RON engine settings with sensible defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use sail_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let machine = StateMachineConfig::<()>::new("mainMenu")
//!         .state(StateConfig::new("mainMenu")
//!             .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Enter), "startGame")))
//!         .state(StateConfig::new("game"))
//!         .transition(Transition::new("mainMenu", "game", "startGame"));
//!
//!     let mut engine = Engine::new(EngineConfig::default(), machine)?;
//!     engine.world_mut().add_system(MovementSystem::new());
//!     engine.world_mut().add_entity(
//!         Entity::new()
//!             .with_component(TransformComponent::default())
//!             .with_component(MovementComponent::with_velocity(Vec2::new(1.0, 0.0))),
//!     );
//!
//!     engine.input_mut().key_down(KeyCode::Enter);
//!     engine.run_fixed(60);
//!     assert_eq!(engine.current_state(), "game");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod input;
pub mod state;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError,
        core::{Config, EngineConfig, LoggingConfig, SimulationConfig},
        foundation::time::FrameClock,
        ecs::{
            Commands, Component, Entity, EntityAccessor, EntityId, Signature, System, World,
            components::{Lifetime, MovementComponent, TransformComponent, Vec2},
            systems::{LifetimeSystem, MovementSystem},
        },
        input::{InputSnapshot, InputState, KeyCode, MouseButton},
        state::{
            InputCondition, InputMapping, StateConfig, StateMachine, StateMachineConfig,
            StateMachineError, Transition,
        },
    };
}
