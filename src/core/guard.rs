//! Guard predicates and transition hooks.
//!
//! Guards are synchronous boolean functions that decide whether a
//! transition is admitted. Hooks are synchronous side-effecting callbacks
//! that run around a transition without influencing admission.

use super::context::TransitionContext;
use std::fmt;
use std::rc::Rc;

/// Predicate that determines if a transition can execute.
///
/// Guards are evaluated before a transition is admitted, before any hook
/// has run.
///
/// # Example
///
/// ```rust
/// use cadence::core::{Guard, TransitionContext};
/// use cadence::Machine;
///
/// let only_forward = Guard::new(|ctx: &TransitionContext| ctx.from_state != ctx.to_state);
///
/// let ctx = TransitionContext::new(Machine::new(), "Idle", "Busy", "work");
/// assert!(only_forward.check(&ctx));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Rc<dyn Fn(&TransitionContext) -> bool>,
}

impl Guard {
    /// Create a guard from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TransitionContext) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Check if the guard admits this attempt.
    pub fn check(&self, ctx: &TransitionContext) -> bool {
        (self.predicate)(ctx)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Side-effecting callback run before or after a transition.
#[derive(Clone)]
pub struct Hook {
    callback: Rc<dyn Fn(&TransitionContext)>,
}

impl Hook {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        Hook {
            callback: Rc::new(callback),
        }
    }

    pub fn call(&self, ctx: &TransitionContext) {
        (self.callback)(ctx)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}
