//! Cadence: an embeddable, asynchronous, event-driven state machine
//!
//! Cadence keeps a registry of named states with asynchronous enter/exit
//! lifecycles and a registry of event-triggered transitions guarded by
//! predicates and instrumented with before/after hooks. A single-flight
//! executor sequences exit → enter → hooks, and a history stack supports
//! stepwise undo with [`Machine::go_back`].
//!
//! The machine is single-threaded and cooperative. It assumes no timer or
//! I/O mechanism: a lifecycle action resumes the executor by consuming the
//! [`Done`] token it was given, immediately or from any later callback.
//!
//! # Core Concepts
//!
//! - **State**: an id with optional asynchronous `on_enter`/`on_exit` actions
//! - **Transition**: `event: from → to`, with an optional guard and hooks
//! - **Reentrancy lock**: events arriving while a transition is in flight are dropped
//! - **History**: completed steps, seeded with a sentinel, consumed by `go_back`
//!
//! # Example
//!
//! ```rust
//! use cadence::{Machine, State, Transition};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let pending = Rc::new(RefCell::new(None));
//! let slot = pending.clone();
//!
//! let machine = Machine::new();
//! machine.add_state(State::new("Idle"));
//! machine.add_state(State::new("Loading").on_enter(move |_, done| {
//!     // Finish later, e.g. from an I/O callback.
//!     *slot.borrow_mut() = Some(done);
//! }));
//! machine.add_transition(Transition::new("load", "Idle", "Loading"));
//! machine.set_initial("Idle");
//! machine.start();
//!
//! machine.trigger_event("load");
//! assert!(machine.is_transitioning());
//! assert_eq!(machine.current(), "Idle");
//!
//! pending.borrow_mut().take().unwrap().succeed();
//! assert!(!machine.is_transitioning());
//! assert_eq!(machine.current(), "Loading");
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod validation;

#[cfg(feature = "tokio-integration")]
pub mod tokio_utils;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use core::{Guard, Hook, State, Transition, TransitionContext, TransitionHistory, TransitionRecord};
pub use machine::{
    BackPolicy, ConfigError, Done, EnterFailurePolicy, Machine, MachineConfig, MachineError,
    ObserverId, Phase, TransitionError, BACK_EVENT, START_EVENT,
};
pub use validation::ConfigIssue;
