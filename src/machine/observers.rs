//! Per-machine observer lists.

use crate::core::TransitionContext;
use std::rc::Rc;

/// Handle returned when an observer is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(&TransitionContext)>;

/// Ordered observers for transition start and finish.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    started: Vec<(ObserverId, Observer)>,
    finished: Vec<(ObserverId, Observer)>,
}

impl Observers {
    pub(crate) fn on_started(&mut self, observer: Observer) -> ObserverId {
        let id = self.allocate();
        self.started.push((id, observer));
        id
    }

    pub(crate) fn on_finished(&mut self, observer: Observer) -> ObserverId {
        let id = self.allocate();
        self.finished.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.started.len() + self.finished.len();
        self.started.retain(|(i, _)| *i != id);
        self.finished.retain(|(i, _)| *i != id);
        before != self.started.len() + self.finished.len()
    }

    // Snapshots let an observer register or remove observers while the
    // list is being notified.
    pub(crate) fn started(&self) -> Vec<Observer> {
        self.started.iter().map(|(_, o)| o.clone()).collect()
    }

    pub(crate) fn finished(&self) -> Vec<Observer> {
        self.finished.iter().map(|(_, o)| o.clone()).collect()
    }

    fn allocate(&mut self) -> ObserverId {
        self.next_id += 1;
        ObserverId(self.next_id)
    }
}
