//! Machine-wide behaviour settings.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Event name of the sentinel record pushed by `start`.
pub const START_EVENT: &str = "__start";

/// Event name of the synthetic transition run by `go_back`.
pub const BACK_EVENT: &str = "__back";

/// What happens to `current` when the destination's `on_enter` fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnterFailurePolicy {
    /// Stay in the source state. Nothing is observed or recorded.
    #[default]
    AbortToSource,

    /// Move `current` to the destination anyway. The finished observers,
    /// `on_after` and history are still skipped and the attempt still
    /// reports failure.
    CommitToDestination,
}

/// How `go_back` treats the transition it reverses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackPolicy {
    /// Run lifecycles and machine observers only. No guard, no hooks.
    #[default]
    HookFree,

    /// Also run the `on_before`/`on_after` hooks of the registered transition
    /// that produced the undone record. Guards are never re-evaluated.
    ReplayHooks,
}

/// Configuration for a [`Machine`](crate::Machine).
///
/// # Example
///
/// ```rust
/// use cadence::{EnterFailurePolicy, MachineConfig};
///
/// let config = MachineConfig::from_json(r#"{ "enter_failure": "commit_to_destination" }"#).unwrap();
/// assert_eq!(config.enter_failure, EnterFailurePolicy::CommitToDestination);
/// assert_eq!(config.back, Default::default());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub enter_failure: EnterFailurePolicy,
    pub back: BackPolicy,
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_failure(mut self, policy: EnterFailurePolicy) -> Self {
        self.enter_failure = policy;
        self
    }

    pub fn back(mut self, policy: BackPolicy) -> Self {
        self.back = policy;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }
}
