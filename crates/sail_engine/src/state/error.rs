//! State machine configuration errors

use thiserror::Error;

/// Fatal configuration problems detected while building a [`super::StateMachine`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    /// The initial state is not among the configured states
    #[error("initial state '{0}' not found")]
    UnknownInitialState(String),

    /// A transition leads to a state that does not exist
    #[error("transition on event '{event}' targets unknown state '{target}'")]
    UnknownTarget {
        /// Event that would trigger the transition
        event: String,
        /// Missing target state
        target: String,
    },

    /// Two states share an identifier
    #[error("state '{0}' is defined more than once")]
    DuplicateState(String),
}
