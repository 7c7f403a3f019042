//! Validation-based configuration diagnostics.
//!
//! Registration never validates: transitions may name states that are
//! registered later, and duplicates are accepted but shadowed. This module
//! inspects a machine on demand and reports ALL problems at once using
//! Stillwater's `Validation`, instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use cadence::{ConfigIssue, Machine, State, Transition};
//!
//! let machine = Machine::new();
//! machine.add_state(State::new("A"));
//! machine.add_transition(Transition::new("go", "A", "B"));
//! machine.add_transition(Transition::new("go", "A", "A"));
//!
//! let result = machine.validate();
//! assert!(result.is_failure());
//! assert_eq!(machine.config_issues().len(), 3);
//! assert!(machine.config_issues().contains(&ConfigIssue::MissingInitialState));
//! ```

mod issues;

pub use issues::ConfigIssue;

use crate::core::{StateRegistry, TransitionRegistry};
use crate::machine::Machine;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigIssue>>;

impl Machine {
    /// Check the machine's configuration, accumulating every issue.
    pub fn validate(&self) -> Check {
        let states = self.inner.states.borrow();
        let transitions = self.inner.transitions.borrow();
        let initial = self.inner.initial.borrow();

        let mut checks = vec![check_initial(initial.as_deref(), &states)];
        checks.extend(check_references(&states, &transitions));
        checks.extend(check_duplicate_states(&states));
        checks.extend(check_shadowed_transitions(&transitions));

        Validation::all_vec(checks).map(|_| ())
    }

    /// Every issue found by [`validate`](Self::validate), in check order.
    pub fn config_issues(&self) -> Vec<ConfigIssue> {
        match self.validate() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(issues) => issues.iter().cloned().collect(),
        }
    }
}

fn check_initial(initial: Option<&str>, states: &StateRegistry) -> Check {
    match initial {
        None | Some("") => Validation::fail(ConfigIssue::MissingInitialState),
        Some(id) if !states.contains(id) => {
            Validation::fail(ConfigIssue::UnknownInitialState { id: id.to_string() })
        }
        Some(_) => Validation::success(()),
    }
}

fn check_references(states: &StateRegistry, transitions: &TransitionRegistry) -> Vec<Check> {
    let mut checks = Vec::new();
    for (_, transition) in transitions.iter() {
        let endpoints = if transition.from == transition.to {
            vec![&transition.from]
        } else {
            vec![&transition.from, &transition.to]
        };
        for state in endpoints {
            if !states.contains(state) {
                checks.push(Validation::fail(ConfigIssue::UnknownState {
                    event: transition.event.clone(),
                    from: transition.from.clone(),
                    state: state.clone(),
                }));
            }
        }
    }
    checks
}

fn check_duplicate_states(states: &StateRegistry) -> Vec<Check> {
    // First-seen order is kept through an index into `counts`.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for state in states.iter() {
        match index.get(state.id()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(state.id(), counts.len());
                counts.push((state.id(), 1));
            }
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| {
            Validation::fail(ConfigIssue::DuplicateState {
                id: id.to_string(),
                count,
            })
        })
        .collect()
}

fn check_shadowed_transitions(transitions: &TransitionRegistry) -> Vec<Check> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut reported: HashSet<(&str, &str)> = HashSet::new();
    let mut checks = Vec::new();
    for (_, transition) in transitions.iter() {
        let key = (transition.from.as_str(), transition.event.as_str());
        if !seen.insert(key) && reported.insert(key) {
            checks.push(Validation::fail(ConfigIssue::ShadowedTransition {
                event: transition.event.clone(),
                from: transition.from.clone(),
            }));
        }
    }
    checks
}
