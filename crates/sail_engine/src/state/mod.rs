//! Data-driven finite state machine
//!
//! A [`StateMachine`] is built once from a [`StateMachineConfig`]: an
//! initial state, a list of [`StateConfig`]s with optional hooks and
//! [`InputMapping`]s, and an ordered list of [`Transition`]s. Events are
//! matched first-come-first-served in registration order; a transition may
//! name the wildcard source [`ANY_STATE`] and may carry a guard over the
//! event payload.
//!
//! ```
//! use sail_engine::input::{InputState, KeyCode};
//! use sail_engine::state::{InputCondition, InputMapping, StateConfig, StateMachine, StateMachineConfig, Transition};
//!
//! let config = StateMachineConfig::<()>::new("mainMenu")
//!     .state(StateConfig::new("mainMenu")
//!         .map_input(InputMapping::new(InputCondition::KeyDown(KeyCode::Enter), "startGame")))
//!     .state(StateConfig::new("game"))
//!     .transition(Transition::new("mainMenu", "game", "startGame"));
//! let mut machine = StateMachine::new(config).unwrap();
//!
//! let mut input = InputState::new();
//! input.key_down(KeyCode::Enter);
//! machine.process_input(&input);
//! assert_eq!(machine.current_state(), "game");
//! ```

pub mod config;
pub mod error;
pub mod machine;
pub mod mapping;

pub use config::{StateConfig, StateId, StateMachineConfig, Transition, TransitionSource, ANY_STATE};
pub use error::StateMachineError;
pub use machine::StateMachine;
pub use mapping::{InputCondition, InputMapping};
