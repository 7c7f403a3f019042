//! Transition history tracking.
//!
//! The history is an ordered stack of completed steps, oldest first. It is
//! seeded with a sentinel record when the machine starts and is consumed
//! one record at a time by `go_back`.
//!
//! `commit` and `rewind` work in place, so each step costs amortized O(1)
//! regardless of depth. `with` is the by-value form of `commit` for
//! building histories fluently.

use crate::machine::START_EVENT;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use cadence::core::TransitionRecord;
///
/// let record = TransitionRecord::new("Pending", "Running", "run");
/// assert_eq!(record.from, "Pending");
/// assert!(!record.is_sentinel());
///
/// let sentinel = TransitionRecord::sentinel("Pending");
/// assert_eq!(sentinel.from, "");
/// assert_eq!(sentinel.event, "__start");
/// assert!(sentinel.is_sentinel());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being transitioned from
    pub from: String,
    /// The state being transitioned to
    pub to: String,
    /// The event that fired the transition
    pub event: String,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            event: event.into(),
            timestamp: Utc::now(),
        }
    }

    /// The baseline record `("", initial, "__start")`.
    pub fn sentinel(initial: impl Into<String>) -> Self {
        Self::new("", initial, START_EVENT)
    }

    pub fn is_sentinel(&self) -> bool {
        self.from.is_empty() && self.event == START_EVENT
    }
}

/// Ordered stack of completed transitions.
///
/// # Example
///
/// ```rust
/// use cadence::core::{TransitionHistory, TransitionRecord};
///
/// let history = TransitionHistory::seeded("Start")
///     .with(TransitionRecord::new("Start", "Middle", "next"))
///     .with(TransitionRecord::new("Middle", "End", "next"));
///
/// assert_eq!(history.depth(), 3);
/// assert_eq!(history.path(), vec!["Start", "Middle", "End"]);
/// assert!(history.can_go_back());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: Vec<TransitionRecord>,
}

impl TransitionHistory {
    /// Create an empty history (a machine that has not started).
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Create a history holding only the sentinel for `initial`.
    pub fn seeded(initial: impl Into<String>) -> Self {
        Self {
            records: vec![TransitionRecord::sentinel(initial)],
        }
    }

    /// Commit a completed step.
    ///
    /// Trailing records whose `to` differs from the new record's `from` are
    /// discarded first, so a forward step taken after `go_back` replaces the
    /// abandoned branch. The first record is never discarded.
    ///
    /// ```rust
    /// use cadence::core::{TransitionHistory, TransitionRecord};
    ///
    /// let mut history = TransitionHistory::seeded("A")
    ///     .with(TransitionRecord::new("A", "B", "ab"))
    ///     .with(TransitionRecord::new("B", "C", "bc"));
    ///
    /// // Diverge from B after the machine went back there.
    /// history.rewind();
    /// history.commit(TransitionRecord::new("B", "D", "bd"));
    ///
    /// assert_eq!(history.path(), vec!["A", "B", "D"]);
    /// ```
    pub fn commit(&mut self, record: TransitionRecord) {
        while self.records.len() > 1
            && self.records.last().is_some_and(|last| last.to != record.from)
        {
            self.records.pop();
        }
        self.records.push(record);
    }

    /// Commit `record` and return the history, for chained construction.
    pub fn with(mut self, record: TransitionRecord) -> Self {
        self.commit(record);
        self
    }

    /// Pop the most recent record. Returns `None` when only the baseline is
    /// left.
    pub fn rewind(&mut self) -> Option<TransitionRecord> {
        if !self.can_go_back() {
            return None;
        }
        self.records.pop()
    }

    /// Number of records, sentinel included.
    pub fn depth(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when there is a step to undo.
    pub fn can_go_back(&self) -> bool {
        self.records.len() > 1
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// Get all records, oldest first.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// Get the path of states traversed, starting with the initial state.
    pub fn path(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.to.as_str()).collect()
    }

    /// Calculate total duration from first to last record.
    ///
    /// Returns `None` if the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
