//! The machine facade.
//!
//! [`Machine`] is a cheap, clonable handle over one state machine instance.
//! All operations take `&self`: lifecycle actions, guards and hooks receive
//! the same handle and may call back into the machine. The machine is
//! single-threaded and cooperative; suspension happens only inside
//! `on_exit`/`on_enter` actions, which resume the executor by consuming
//! their [`Done`] token.
//!
//! # Example
//!
//! ```rust
//! use cadence::{Machine, State, Transition};
//!
//! let machine = Machine::new();
//! machine.add_state(State::new("Idle"));
//! machine.add_state(State::new("Working").on_enter(|_, done| done.succeed()));
//! machine.add_transition(Transition::new("start", "Idle", "Working"));
//! machine.set_initial("Idle");
//! machine.start();
//!
//! machine.trigger_event("start");
//! assert_eq!(machine.current(), "Working");
//!
//! machine.go_back();
//! assert_eq!(machine.current(), "Idle");
//! ```

mod config;
mod done;
mod error;
mod executor;
mod observers;

pub use config::{BackPolicy, EnterFailurePolicy, MachineConfig, BACK_EVENT, START_EVENT};
pub use done::Done;
pub use error::{ConfigError, MachineError, TransitionError};
pub use executor::{Completion, Phase};
pub use observers::ObserverId;

use crate::core::{
    State, StateRegistry, Transition, TransitionContext, TransitionHistory, TransitionId,
    TransitionRegistry,
};
use executor::Executor;
use observers::Observers;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info};
use uuid::Uuid;

pub(crate) struct Inner {
    id: Uuid,
    config: Cell<MachineConfig>,
    pub(crate) states: RefCell<StateRegistry>,
    pub(crate) transitions: RefCell<TransitionRegistry>,
    history: RefCell<TransitionHistory>,
    current: RefCell<String>,
    pub(crate) initial: RefCell<Option<String>>,
    executor: RefCell<Executor>,
    observers: RefCell<Observers>,
}

/// Handle to an asynchronous, event-driven state machine.
#[derive(Clone)]
pub struct Machine {
    pub(crate) inner: Rc<Inner>,
}

impl Machine {
    /// Create an empty machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: Uuid::new_v4(),
                config: Cell::new(config),
                states: RefCell::new(StateRegistry::new()),
                transitions: RefCell::new(TransitionRegistry::new()),
                history: RefCell::new(TransitionHistory::new()),
                current: RefCell::new(String::new()),
                initial: RefCell::new(None),
                executor: RefCell::new(Executor::default()),
                observers: RefCell::new(Observers::default()),
            }),
        }
    }

    /// Unique id of this instance, attached to its log events.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> MachineConfig {
        self.inner.config.get()
    }

    /// Replace the configuration. Applies to completions that arrive after
    /// the call, including those of a run already in flight.
    pub fn set_config(&self, config: MachineConfig) {
        self.inner.config.set(config);
    }

    /// Register a state. No validation is performed.
    pub fn add_state(&self, state: State) {
        self.inner.states.borrow_mut().add(state);
    }

    /// Register a transition. Its states are resolved when it executes.
    pub fn add_transition(&self, transition: Transition) -> TransitionId {
        self.inner.transitions.borrow_mut().add(transition)
    }

    /// Set the state `start` enters. Checked by `start`, not here.
    pub fn set_initial(&self, id: impl Into<String>) {
        *self.inner.initial.borrow_mut() = Some(id.into());
    }

    pub fn initial(&self) -> Option<String> {
        self.inner.initial.borrow().clone()
    }

    /// Start the machine in its initial state.
    ///
    /// Sets `current` to the initial state, resets the history to the
    /// sentinel record and fires the initial state's `on_enter` without
    /// waiting for it. Calling it again on an idle machine restarts it.
    pub fn try_start(&self) -> Result<(), MachineError> {
        if self.is_transitioning() {
            return Err(MachineError::Transitioning);
        }
        let initial = self
            .initial()
            .filter(|id| !id.is_empty())
            .ok_or(MachineError::MissingInitialState)?;
        let state = self
            .inner
            .states
            .borrow()
            .find(&initial)
            .ok_or_else(|| MachineError::UnknownInitialState {
                id: initial.clone(),
            })?;

        *self.inner.current.borrow_mut() = initial.clone();
        *self.inner.history.borrow_mut() = TransitionHistory::seeded(&initial);
        info!(machine = %self.id(), state = %initial, "machine started");

        if let Some(action) = state.enter_action() {
            action(self, Done::detached(self, &initial));
        }
        Ok(())
    }

    /// Start the machine, treating a missing or unknown initial state as a
    /// programming error.
    ///
    /// # Panics
    ///
    /// Panics if [`try_start`](Self::try_start) fails.
    pub fn start(&self) {
        if let Err(err) = self.try_start() {
            panic!("cannot start state machine: {err}");
        }
    }

    /// Fire `event` from the current state.
    ///
    /// Dropped if a transition is in flight, if no transition matches, or if
    /// the matching transition's guard rejects it.
    pub fn trigger_event(&self, event: &str) {
        self.dispatch(event, None);
    }

    /// Like [`trigger_event`](Self::trigger_event), reporting the outcome to
    /// `on_done`. Returns whether the attempt was admitted; `on_done` is only
    /// called for admitted attempts.
    pub fn trigger_event_with<F>(&self, event: &str, on_done: F) -> bool
    where
        F: FnOnce(Result<(), TransitionError>) + 'static,
    {
        self.dispatch(event, Some(Box::new(on_done)))
    }

    /// Attempt an ad hoc transition that need not be registered.
    ///
    /// Returns whether the attempt was admitted, not whether it succeeded.
    pub fn try_transition(&self, transition: Transition) -> bool {
        self.admit(Rc::new(transition), None)
    }

    pub fn try_transition_with<F>(&self, transition: Transition, on_done: F) -> bool
    where
        F: FnOnce(Result<(), TransitionError>) + 'static,
    {
        self.admit(Rc::new(transition), Some(Box::new(on_done)))
    }

    /// Undo the most recent recorded step.
    ///
    /// No-op when there is nothing to undo or a transition is in flight.
    /// The reversal itself is never recorded.
    pub fn go_back(&self) {
        if !self.can_go_back() || self.is_transitioning() {
            debug!(machine = %self.id(), "go_back ignored");
            return;
        }
        let rewound = {
            let mut history = self.inner.history.borrow_mut();
            let popped = history.rewind();
            let target = history.last().map(|record| record.to.clone());
            popped.zip(target).map(|(popped, target)| (target, popped))
        };
        let Some((target, popped)) = rewound else {
            return;
        };

        let mut back = Transition::new(BACK_EVENT, self.current(), target);
        if self.config().back == BackPolicy::ReplayHooks {
            if let Some(original) = self.inner.transitions.borrow().find(&popped.from, &popped.event)
            {
                back.on_before = original.on_before.clone();
                back.on_after = original.on_after.clone();
            }
        }
        self.do_transition(Rc::new(back), false, None);
    }

    /// Id of the current state; empty before `start`.
    pub fn current(&self) -> String {
        self.inner.current.borrow().clone()
    }

    /// True while a transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.phase() != Phase::Idle
    }

    pub fn phase(&self) -> Phase {
        self.inner.executor.borrow().phase()
    }

    /// True if `go_back` has a step to undo.
    pub fn can_go_back(&self) -> bool {
        self.inner.history.borrow().can_go_back()
    }

    /// Snapshot of the history stack.
    pub fn history(&self) -> TransitionHistory {
        self.inner.history.borrow().clone()
    }

    /// Log the history stack, one event per record.
    pub fn dump_history(&self) {
        let history = self.inner.history.borrow();
        info!(machine = %self.id(), depth = history.depth(), "state machine history");
        for (index, record) in history.records().iter().enumerate() {
            info!(
                machine = %self.id(),
                index,
                from = %record.from,
                to = %record.to,
                event = %record.event,
                "history record"
            );
        }
    }

    /// Observe every admitted attempt, before its `on_before` hook.
    pub fn when_transition_started<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.inner.observers.borrow_mut().on_started(Rc::new(observer))
    }

    /// Observe every successful transition, before its `on_after` hook.
    pub fn when_transition_finished<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.inner.observers.borrow_mut().on_finished(Rc::new(observer))
    }

    /// Unbind an observer. Returns false if it was not registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.inner.observers.borrow_mut().remove(id)
    }

    fn dispatch(&self, event: &str, on_done: Option<Completion>) -> bool {
        if self.is_transitioning() {
            debug!(machine = %self.id(), event, "event dropped; transition in flight");
            return false;
        }
        let current = self.current();
        let found = self.inner.transitions.borrow().find(&current, event);
        match found {
            Some(transition) => self.admit(transition, on_done),
            None => {
                debug!(machine = %self.id(), state = %current, event, "no transition for event");
                false
            }
        }
    }

    fn admit(&self, transition: Rc<Transition>, on_done: Option<Completion>) -> bool {
        if self.is_transitioning() {
            debug!(machine = %self.id(), event = %transition.event, "attempt dropped; transition in flight");
            return false;
        }
        let ctx = TransitionContext::new(
            self.clone(),
            &transition.from,
            &transition.to,
            &transition.event,
        );
        if !transition.admits(&ctx) {
            debug!(
                machine = %self.id(),
                from = %transition.from,
                to = %transition.to,
                event = %transition.event,
                "guard rejected transition"
            );
            return false;
        }
        self.do_transition(transition, true, on_done);
        true
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<Inner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Machine");
        debug.field("id", &self.inner.id);
        match self.inner.current.try_borrow() {
            Ok(current) => debug.field("current", &*current),
            Err(_) => debug.field("current", &"<borrowed>"),
        };
        match self.inner.executor.try_borrow() {
            Ok(executor) => debug.field("phase", &executor.phase()),
            Err(_) => debug.field("phase", &"<borrowed>"),
        };
        debug.finish_non_exhaustive()
    }
}
