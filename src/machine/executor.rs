//! Single-flight transition executor.
//!
//! A run moves through `Exiting → Entering → Finalizing` and back to `Idle`.
//! Each asynchronous phase hands out a [`Done`] token stamped with the run's
//! sequence number and phase; a completion is accepted only if it matches
//! the run currently in flight and the phase it is waiting on. The run is
//! taken out of the executor exactly once, which is what clears the
//! reentrancy lock.

use super::config::EnterFailurePolicy;
use super::done::Done;
use super::error::TransitionError;
use super::Machine;
use crate::core::{State, Transition, TransitionContext, TransitionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Callback receiving the final outcome of one attempt.
pub type Completion = Box<dyn FnOnce(Result<(), TransitionError>)>;

/// Where the executor is within the current run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No run in flight.
    #[default]
    Idle,
    /// Waiting on the source state's `on_exit`.
    Exiting,
    /// Waiting on the destination state's `on_enter`.
    Entering,
    /// Updating `current`, firing observers and hooks, committing history.
    Finalizing,
}

struct Run {
    seq: u64,
    phase: Phase,
    transition: Rc<Transition>,
    to_state: Rc<State>,
    started_at: DateTime<Utc>,
    record: bool,
    on_done: Option<Completion>,
}

#[derive(Default)]
pub(crate) struct Executor {
    seq: u64,
    run: Option<Run>,
}

impl Executor {
    pub(crate) fn phase(&self) -> Phase {
        self.run.as_ref().map_or(Phase::Idle, |run| run.phase)
    }

    fn begin(&mut self, mut run: Run) -> u64 {
        self.seq += 1;
        run.seq = self.seq;
        run.phase = Phase::Exiting;
        self.run = Some(run);
        self.seq
    }

    fn active(&self, seq: u64, phase: Phase) -> Option<&Run> {
        self.run
            .as_ref()
            .filter(|run| run.seq == seq && run.phase == phase)
    }

    fn advance(&mut self, to: Phase) -> Option<&Run> {
        let run = self.run.as_mut()?;
        run.phase = to;
        Some(run)
    }

    fn release(&mut self) -> Option<Run> {
        self.run.take()
    }
}

impl Machine {
    /// Execute `transition`, recording it in history when `record` is set.
    ///
    /// The caller has already checked the reentrancy lock and the guard.
    pub(crate) fn do_transition(
        &self,
        transition: Rc<Transition>,
        record: bool,
        on_done: Option<Completion>,
    ) {
        let (from_state, to_state) = {
            let states = self.inner.states.borrow();
            (states.find(&transition.from), states.find(&transition.to))
        };
        let (from_state, to_state) = match (from_state, to_state) {
            (Some(from), Some(to)) => (from, to),
            (from, _) => {
                let id = if from.is_none() {
                    transition.from.clone()
                } else {
                    transition.to.clone()
                };
                error!(
                    machine = %self.id(),
                    event = %transition.event,
                    state = %id,
                    "transition references an unregistered state"
                );
                if let Some(on_done) = on_done {
                    on_done(Err(TransitionError::UnknownState { id }));
                }
                return;
            }
        };

        let ctx = TransitionContext::new(
            self.clone(),
            &transition.from,
            &transition.to,
            &transition.event,
        );
        let seq = self.inner.executor.borrow_mut().begin(Run {
            seq: 0,
            phase: Phase::Idle,
            transition: transition.clone(),
            to_state,
            started_at: ctx.started_at,
            record,
            on_done,
        });
        debug!(
            machine = %self.id(),
            seq,
            from = %ctx.from_state,
            to = %ctx.to_state,
            event = %ctx.event,
            "transition started"
        );

        self.notify_started(&ctx);
        if let Some(hook) = &transition.on_before {
            hook.call(&ctx);
        }

        match from_state.exit_action() {
            Some(action) => action(self, Done::for_run(self, seq, Phase::Exiting)),
            None => self.complete(seq, Phase::Exiting, true),
        }
    }

    /// Accept the result of the phase `phase` of run `seq`.
    pub(crate) fn complete(&self, seq: u64, phase: Phase, success: bool) {
        let mut executor = self.inner.executor.borrow_mut();
        if executor.active(seq, phase).is_none() {
            debug!(machine = %self.id(), seq, ?phase, "ignoring stale completion");
            return;
        }

        if !success {
            if phase == Phase::Entering
                && self.config().enter_failure == EnterFailurePolicy::CommitToDestination
            {
                if let Some(run) = executor.active(seq, phase) {
                    *self.inner.current.borrow_mut() = run.transition.to.clone();
                }
            }
            let run = executor.release();
            drop(executor);
            if let Some(run) = run {
                self.abort(run, phase);
            }
            return;
        }

        match phase {
            Phase::Exiting => {
                let action = executor
                    .advance(Phase::Entering)
                    .and_then(|run| run.to_state.enter_action());
                drop(executor);
                match action {
                    Some(action) => action(self, Done::for_run(self, seq, Phase::Entering)),
                    None => self.complete(seq, Phase::Entering, true),
                }
            }
            Phase::Entering => {
                let _ = executor.advance(Phase::Finalizing);
                drop(executor);
                self.finalize(seq);
            }
            Phase::Idle | Phase::Finalizing => {}
        }
    }

    fn finalize(&self, seq: u64) {
        let snapshot = {
            let executor = self.inner.executor.borrow();
            executor
                .active(seq, Phase::Finalizing)
                .map(|run| (run.transition.clone(), run.started_at, run.record))
        };
        let Some((transition, started_at, record)) = snapshot else {
            return;
        };

        *self.inner.current.borrow_mut() = transition.to.clone();

        let mut ctx = TransitionContext::new(
            self.clone(),
            &transition.from,
            &transition.to,
            &transition.event,
        );
        ctx.started_at = started_at;
        self.notify_finished(&ctx);
        if let Some(hook) = &transition.on_after {
            hook.call(&ctx);
        }

        if record {
            self.inner.history.borrow_mut().commit(TransitionRecord::new(
                &transition.from,
                &transition.to,
                &transition.event,
            ));
        }

        let run = self.inner.executor.borrow_mut().release();
        debug!(
            machine = %self.id(),
            seq,
            from = %transition.from,
            to = %transition.to,
            event = %transition.event,
            "transition finished"
        );
        if let Some(on_done) = run.and_then(|run| run.on_done) {
            on_done(Ok(()));
        }
    }

    fn abort(&self, run: Run, phase: Phase) {
        let error = match phase {
            Phase::Exiting => TransitionError::ExitFailed {
                state: run.transition.from.clone(),
            },
            _ => TransitionError::EnterFailed {
                state: run.transition.to.clone(),
            },
        };
        warn!(
            machine = %self.id(),
            seq = run.seq,
            event = %run.transition.event,
            %error,
            "transition aborted"
        );
        if let Some(on_done) = run.on_done {
            on_done(Err(error));
        }
    }

    fn notify_started(&self, ctx: &TransitionContext) {
        let observers = self.inner.observers.borrow().started();
        for observer in observers {
            observer(ctx);
        }
    }

    fn notify_finished(&self, ctx: &TransitionContext) {
        let observers = self.inner.observers.borrow().finished();
        for observer in observers {
            observer(ctx);
        }
    }
}
