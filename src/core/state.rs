//! State definitions with asynchronous enter/exit lifecycles.
//!
//! A state is identified by a string id and may carry an `on_enter` and an
//! `on_exit` action. Actions are asynchronous in the callback sense: they
//! receive a [`Done`] token and report success or failure by consuming it,
//! either immediately or later from a timer or I/O completion.

use crate::machine::{Done, Machine};
use std::fmt;
use std::rc::Rc;

/// Asynchronous lifecycle action attached to a state.
///
/// The action is handed the machine and a one-shot [`Done`] token. The
/// transition stays in flight until the token is consumed.
pub type LifecycleAction = Rc<dyn Fn(&Machine, Done)>;

/// A named state with optional asynchronous entry and exit handlers.
///
/// States are immutable once registered. Cloning is cheap: actions are
/// reference counted.
///
/// # Example
///
/// ```rust
/// use cadence::core::State;
///
/// let idle = State::new("Idle");
/// let working = State::new("Working")
///     .on_enter(|_machine, done| done.succeed())
///     .on_exit(|_machine, done| done.succeed());
///
/// assert_eq!(idle.id(), "Idle");
/// assert!(!idle.has_enter_action());
/// assert!(working.has_enter_action());
/// assert!(working.has_exit_action());
/// ```
#[derive(Clone)]
pub struct State {
    id: String,
    on_enter: Option<LifecycleAction>,
    on_exit: Option<LifecycleAction>,
}

impl State {
    /// Create a state with no lifecycle actions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            on_enter: None,
            on_exit: None,
        }
    }

    /// Attach the action run when the machine enters this state.
    pub fn on_enter<F>(mut self, action: F) -> Self
    where
        F: Fn(&Machine, Done) + 'static,
    {
        self.on_enter = Some(Rc::new(action));
        self
    }

    /// Attach the action run when the machine leaves this state.
    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&Machine, Done) + 'static,
    {
        self.on_exit = Some(Rc::new(action));
        self
    }

    /// The state's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_enter_action(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_exit_action(&self) -> bool {
        self.on_exit.is_some()
    }

    pub(crate) fn enter_action(&self) -> Option<LifecycleAction> {
        self.on_enter.clone()
    }

    pub(crate) fn exit_action(&self) -> Option<LifecycleAction> {
        self.on_exit.clone()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

impl From<&str> for State {
    fn from(id: &str) -> Self {
        State::new(id)
    }
}

impl From<String> for State {
    fn from(id: String) -> Self {
        State::new(id)
    }
}
