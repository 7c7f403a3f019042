//! Context handed to guards, hooks and observers.

use crate::machine::Machine;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Read-only view of one transition attempt.
///
/// A context is created per attempt and passed by reference to callbacks.
/// It holds a handle to the machine so callbacks can query it (or trigger
/// further events, subject to the reentrancy lock).
#[derive(Clone, Debug)]
pub struct TransitionContext {
    pub machine: Machine,
    pub from_state: String,
    pub to_state: String,
    pub event: String,
    pub started_at: DateTime<Utc>,
}

impl TransitionContext {
    pub fn new(
        machine: Machine,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            machine,
            from_state: from_state.into(),
            to_state: to_state.into(),
            event: event.into(),
            started_at: Utc::now(),
        }
    }

    /// Time since the attempt started (pure)
    pub fn elapsed(&self) -> Duration {
        let now = Utc::now();
        now.signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_attempt_fields() {
        let machine = Machine::new();
        let ctx = TransitionContext::new(machine.clone(), "A", "B", "go");

        assert_eq!(ctx.from_state, "A");
        assert_eq!(ctx.to_state, "B");
        assert_eq!(ctx.event, "go");
        assert_eq!(ctx.machine.id(), machine.id());
    }

    #[test]
    fn elapsed_is_never_negative() {
        let mut ctx = TransitionContext::new(Machine::new(), "A", "B", "go");
        ctx.started_at = Utc::now() + chrono::Duration::seconds(60);
        assert_eq!(ctx.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_measures_from_start() {
        let mut ctx = TransitionContext::new(Machine::new(), "A", "B", "go");
        ctx.started_at = Utc::now() - chrono::Duration::seconds(5);
        assert!(ctx.elapsed() >= Duration::from_secs(5));
    }
}
