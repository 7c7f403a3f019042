//! Configuration findings.

use thiserror::Error;

/// A problem found in a machine's registered states and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("No initial state set")]
    MissingInitialState,

    #[error("Initial state '{id}' is not registered")]
    UnknownInitialState { id: String },

    #[error("Transition '{event}' from '{from}' references unregistered state '{state}'")]
    UnknownState {
        event: String,
        from: String,
        state: String,
    },

    #[error("State '{id}' is registered {count} times; only the first is used")]
    DuplicateState { id: String, count: usize },

    #[error("Transition '{event}' from '{from}' is shadowed by an earlier registration")]
    ShadowedTransition { event: String, from: String },
}
