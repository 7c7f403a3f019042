//! Event-triggered transitions between states.

use super::context::TransitionContext;
use super::guard::{Guard, Hook};

/// A transition from one state to another, fired by a named event.
///
/// `from` and `to` are state ids. They are not checked at registration;
/// a missing state is reported when the transition executes.
///
/// # Example
///
/// ```rust
/// use cadence::core::Transition;
///
/// let submit = Transition::new("submit", "Draft", "Review")
///     .when(|ctx| ctx.machine.current() == "Draft")
///     .after(|ctx| println!("entered {}", ctx.to_state));
///
/// assert!(submit.matches("Draft", "submit"));
/// assert!(!submit.matches("Review", "submit"));
/// ```
#[derive(Clone, Debug)]
pub struct Transition {
    pub event: String,
    pub from: String,
    pub to: String,
    pub guard: Option<Guard>,
    pub on_before: Option<Hook>,
    pub on_after: Option<Hook>,
}

impl Transition {
    /// Create an unguarded transition without hooks.
    pub fn new(event: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            from: from.into(),
            to: to.into(),
            guard: None,
            on_before: None,
            on_after: None,
        }
    }

    /// Attach a guard predicate.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Attach a guard using a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&TransitionContext) -> bool + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Attach a hook run after the guard admits the attempt, before exit/enter.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.on_before = Some(Hook::new(hook));
        self
    }

    /// Attach a hook run once the destination has been entered successfully.
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.on_after = Some(Hook::new(hook));
        self
    }

    /// Check if this transition is keyed on `(from, event)`.
    pub fn matches(&self, from: &str, event: &str) -> bool {
        self.from == from && self.event == event
    }

    /// Check the guard, if any, against an attempt.
    pub fn admits(&self, ctx: &TransitionContext) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(ctx))
    }
}
