//! Tokio adapters for lifecycle actions.
//!
//! The core never assumes a timer or I/O mechanism. These helpers bridge
//! futures into the callback contract by spawning them on the current
//! [`LocalSet`](tokio::task::LocalSet) and consuming the [`Done`] token with
//! the future's result. The machine is `!Send`, so everything runs on the
//! thread that owns it.

use crate::machine::{Done, Machine};
use std::future::Future;
use std::time::Duration;

/// Wrap an async function as a lifecycle action.
///
/// The future resolves to the action's success flag.
///
/// # Panics
///
/// The returned action panics if it is invoked outside a `LocalSet`.
///
/// # Example
///
/// ```rust
/// use cadence::tokio_utils::async_action;
/// use cadence::{Machine, State, Transition};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let local = tokio::task::LocalSet::new();
/// local.run_until(async {
///     let machine = Machine::new();
///     machine.add_state(State::new("Idle"));
///     machine.add_state(State::new("Loaded").on_enter(async_action(|_machine| async { true })));
///     machine.add_transition(Transition::new("load", "Idle", "Loaded"));
///     machine.set_initial("Idle");
///     machine.start();
///
///     machine.trigger_event("load");
///     assert!(machine.is_transitioning());
///
///     while machine.is_transitioning() {
///         tokio::task::yield_now().await;
///     }
///     assert_eq!(machine.current(), "Loaded");
/// }).await;
/// # }
/// ```
pub fn async_action<F, Fut>(action: F) -> impl Fn(&Machine, Done) + 'static
where
    F: Fn(Machine) -> Fut + 'static,
    Fut: Future<Output = bool> + 'static,
{
    move |machine, done| {
        let fut = action(machine.clone());
        tokio::task::spawn_local(async move {
            done.complete(fut.await);
        });
    }
}

/// A lifecycle action that reports `success` after `delay`.
pub fn delayed(delay: Duration, success: bool) -> impl Fn(&Machine, Done) + 'static {
    async_action(move |_| async move {
        tokio::time::sleep(delay).await;
        success
    })
}
