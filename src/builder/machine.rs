//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{State, Transition, TransitionContext};
use crate::machine::{BackPolicy, EnterFailurePolicy, Machine, MachineConfig};

type Observer = Box<dyn Fn(&TransitionContext)>;

/// Builder for constructing machines with a fluent API.
///
/// The built machine is configured but not started.
#[derive(Default)]
pub struct MachineBuilder {
    config: MachineConfig,
    initial: Option<String>,
    states: Vec<State>,
    transitions: Vec<Transition>,
    started: Vec<Observer>,
    finished: Vec<Observer>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial state (required).
    pub fn initial(mut self, id: impl Into<String>) -> Self {
        self.initial = Some(id.into());
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn enter_failure(mut self, policy: EnterFailurePolicy) -> Self {
        self.config.enter_failure = policy;
        self
    }

    pub fn back(mut self, policy: BackPolicy) -> Self {
        self.config.back = policy;
        self
    }

    /// Add a state.
    pub fn state(mut self, state: impl Into<State>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Add multiple states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<State>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn on_transition_started<F>(mut self, observer: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.started.push(Box::new(observer));
        self
    }

    pub fn on_transition_finished<F>(mut self, observer: F) -> Self
    where
        F: Fn(&TransitionContext) + 'static,
    {
        self.finished.push(Box::new(observer));
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Machine, BuildError> {
        let initial = self
            .initial
            .filter(|id| !id.is_empty())
            .ok_or(BuildError::MissingInitialState)?;

        let machine = Machine::with_config(self.config);
        for state in self.states {
            machine.add_state(state);
        }
        for transition in self.transitions {
            machine.add_transition(transition);
        }
        for observer in self.started {
            machine.when_transition_started(observer);
        }
        for observer in self.finished {
            machine.when_transition_finished(observer);
        }
        machine.set_initial(initial);

        Ok(machine)
    }
}
