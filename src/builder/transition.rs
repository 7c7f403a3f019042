//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, Hook, Transition, TransitionContext};

/// Builder for constructing transitions with a fluent API.
#[derive(Default)]
pub struct TransitionBuilder {
    event: Option<String>,
    from: Option<String>,
    to: Option<String>,
    guard: Option<Guard>,
    on_before: Option<Hook>,
    on_after: Option<Hook>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the source state (required).
    pub fn from(mut self, id: impl Into<String>) -> Self {
        self.from = Some(id.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, id: impl Into<String>) -> Self {
        self.to = Some(id.into());
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TransitionContext) -> bool + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.on_before = Some(Hook::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.on_after = Some(Hook::new(hook));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition, BuildError> {
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition {
            event,
            from,
            to,
            guard: self.guard,
            on_before: self.on_before,
            on_after: self.on_after,
        })
    }
}
