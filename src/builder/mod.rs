//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and macros for assembling machines
//! from states and transitions with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Transition, TransitionContext};

/// Create an unguarded transition without hooks.
///
/// # Example
///
/// ```
/// use cadence::builder::simple_transition;
///
/// let transition = simple_transition("start", "Idle", "Working");
/// assert!(transition.matches("Idle", "start"));
/// ```
pub fn simple_transition(
    event: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
) -> Transition {
    Transition::new(event, from, to)
}

/// Create a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use cadence::builder::guarded_transition;
/// use cadence::core::TransitionContext;
/// use cadence::Machine;
///
/// let transition = guarded_transition("retry", "Failed", "Working", |ctx| ctx.elapsed().as_secs() < 30);
///
/// let ctx = TransitionContext::new(Machine::new(), "Failed", "Working", "retry");
/// assert!(transition.admits(&ctx));
/// ```
pub fn guarded_transition<F>(
    event: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
    guard: F,
) -> Transition
where
    F: Fn(&TransitionContext) -> bool + 'static,
{
    Transition::new(event, from, to).when(guard)
}
