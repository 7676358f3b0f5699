//! Common state machine error types
//!
//! Shared across the lifecycle domain's state machines. Transitions are
//! requested by target state, so errors carry the (from, to) pair that was
//! rejected rather than an event name.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("invalid {entity} transition: {from} -> {to} is not allowed")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("{entity} is in terminal state {state} and cannot transition")]
    TerminalState {
        entity: &'static str,
        state: String,
    },
}

impl StateError {
    /// The entity kind this error was raised for
    pub fn entity(&self) -> &'static str {
        match self {
            StateError::InvalidTransition { entity, .. } => entity,
            StateError::TerminalState { entity, .. } => entity,
        }
    }
}
