//! Arena-backed registries for states and transitions.
//!
//! Both registries are append-only stores. Lookups scan in registration
//! order and return the first match, so a later registration with the same
//! key is never resolved. Definitions are handed out as `Rc` clones: a run in
//! flight keeps the exact definition it resolved even if more entries are
//! registered while it is suspended.

use super::state::State;
use super::transition::Transition;
use std::rc::Rc;

/// Index of a transition in its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(usize);

impl TransitionId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct StateRegistry {
    states: Vec<Rc<State>>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. Duplicate ids are accepted but shadowed.
    pub fn add(&mut self, state: State) {
        self.states.push(Rc::new(state));
    }

    /// First state registered under `id`.
    pub fn find(&self, id: &str) -> Option<Rc<State>> {
        self.states.iter().find(|s| s.id() == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.states.iter().any(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TransitionRegistry {
    transitions: Vec<Rc<Transition>>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transition: Transition) -> TransitionId {
        self.transitions.push(Rc::new(transition));
        TransitionId(self.transitions.len() - 1)
    }

    /// First transition keyed on `(from, event)`, in registration order.
    pub fn find(&self, from: &str, event: &str) -> Option<Rc<Transition>> {
        self.transitions
            .iter()
            .find(|t| t.matches(from, event))
            .cloned()
    }

    pub fn get(&self, id: TransitionId) -> Option<Rc<Transition>> {
        self.transitions.get(id.0).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(i, t)| (TransitionId(i), t.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
