//! Machine error types.

use thiserror::Error;

/// Errors raised by `start`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("Initial state not specified. Call .set_initial(id) before .start()")]
    MissingInitialState,

    #[error("Initial state '{id}' is not registered")]
    UnknownInitialState { id: String },

    #[error("Cannot start while a transition is in flight")]
    Transitioning,
}

/// Why a transition attempt did not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Transition references unregistered state '{id}'")]
    UnknownState { id: String },

    #[error("Exit from state '{state}' failed")]
    ExitFailed { state: String },

    #[error("Entry into state '{state}' failed")]
    EnterFailed { state: String },
}

/// Errors that can occur when loading a [`MachineConfig`](super::MachineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
