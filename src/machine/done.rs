//! One-shot completion token for lifecycle actions.

use super::executor::Phase;
use super::{Inner, Machine};
use std::fmt;
use std::rc::Weak;
use tracing::{debug, warn};
use uuid::Uuid;

/// Completion handle passed to every `on_enter`/`on_exit` action.
///
/// Consuming the token reports the action's result to the machine. Because
/// every reporting method takes `self`, an action can report at most once.
/// A token that answers a phase the executor has already left is ignored.
///
/// Dropping the token without reporting leaves the machine transitioning
/// for good; the core has no timeout of its own.
pub struct Done {
    target: Target,
    settled: bool,
}

enum Target {
    Run {
        machine: Weak<Inner>,
        seq: u64,
        phase: Phase,
    },
    // Initial entry from `start`: nobody waits on it.
    Detached {
        machine: Uuid,
        state: String,
    },
}

impl Done {
    pub(crate) fn for_run(machine: &Machine, seq: u64, phase: Phase) -> Self {
        Self {
            target: Target::Run {
                machine: machine.downgrade(),
                seq,
                phase,
            },
            settled: false,
        }
    }

    pub(crate) fn detached(machine: &Machine, state: &str) -> Self {
        Self {
            target: Target::Detached {
                machine: machine.id(),
                state: state.to_string(),
            },
            settled: false,
        }
    }

    /// Report the action's result.
    pub fn complete(mut self, success: bool) {
        self.settled = true;
        match &self.target {
            Target::Run {
                machine,
                seq,
                phase,
            } => match Machine::upgrade(machine) {
                Some(machine) => machine.complete(*seq, *phase, success),
                None => debug!(seq, ?phase, "machine dropped before completion"),
            },
            Target::Detached { machine, state } => {
                if success {
                    debug!(%machine, state = %state, "initial state entered");
                } else {
                    warn!(%machine, state = %state, "initial state entry reported failure");
                }
            }
        }
    }

    pub fn succeed(self) {
        self.complete(true)
    }

    pub fn fail(self) {
        self.complete(false)
    }

    /// The executor phase this token answers.
    pub fn phase(&self) -> Phase {
        match &self.target {
            Target::Run { phase, .. } => *phase,
            Target::Detached { .. } => Phase::Entering,
        }
    }
}

impl Drop for Done {
    fn drop(&mut self) {
        if !self.settled {
            if let Target::Run { seq, phase, .. } = &self.target {
                warn!(
                    seq,
                    ?phase,
                    "completion dropped without a result; machine stays transitioning"
                );
            }
        }
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("phase", &self.phase())
            .field("settled", &self.settled)
            .finish()
    }
}
