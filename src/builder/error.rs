//! Build errors for machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building machines and transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(id) before .build()")]
    MissingInitialState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition source state not specified. Call .from(id)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(id)")]
    MissingToState,
}
