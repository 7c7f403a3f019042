//! Core state machine types.
//!
//! This module contains the value types the machine is assembled from:
//! - State definitions with asynchronous lifecycle actions
//! - Transitions with guard predicates and hooks
//! - The per-attempt transition context
//! - The undo history stack
//! - First-match-wins registries for states and transitions
//!
//! None of these types drive execution; the [`Machine`](crate::Machine)
//! facade does.

mod context;
mod guard;
mod history;
mod registry;
mod state;
mod transition;

pub use context::TransitionContext;
pub use guard::{Guard, Hook};
pub use history::{TransitionHistory, TransitionRecord};
pub use registry::{StateRegistry, TransitionId, TransitionRegistry};
pub use state::{LifecycleAction, State};
pub use transition::Transition;
