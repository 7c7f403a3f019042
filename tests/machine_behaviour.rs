//! End-to-end behaviour of the machine facade and executor.
//!
//! Asynchronous lifecycle actions are modelled with deferred tokens: the
//! action parks its `Done` in a slot and the test completes it later, which
//! is exactly what a timer or I/O callback would do.

use cadence::{
    BackPolicy, Done, EnterFailurePolicy, Machine, MachineBuilder, MachineConfig, Phase, State,
    Transition, TransitionBuilder, TransitionError, BACK_EVENT,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Slot = Rc<RefCell<Option<Done>>>;
type Outcomes = Rc<RefCell<Vec<Result<(), TransitionError>>>>;

fn deferred(slot: &Slot) -> impl Fn(&Machine, Done) + 'static {
    let slot = slot.clone();
    move |_, done| *slot.borrow_mut() = Some(done)
}

fn resolve(slot: &Slot, success: bool) {
    let done = slot.borrow_mut().take().expect("no pending completion");
    done.complete(success);
}

fn counter() -> (Rc<Cell<u32>>, impl Fn(&cadence::TransitionContext) + 'static) {
    let count = Rc::new(Cell::new(0));
    let handle = count.clone();
    (count, move |_: &cadence::TransitionContext| handle.set(handle.get() + 1))
}

fn recorder() -> (Outcomes, impl FnOnce(Result<(), TransitionError>) + 'static) {
    let outcomes: Outcomes = Rc::default();
    let sink = outcomes.clone();
    (outcomes, move |r| sink.borrow_mut().push(r))
}

fn abc() -> Machine {
    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_state(State::new("C"));
    machine.add_transition(Transition::new("ab", "A", "B"));
    machine.add_transition(Transition::new("bc", "B", "C"));
    machine.set_initial("A");
    machine.start();
    machine
}

#[test]
fn start_establishes_baseline() {
    let machine = abc();

    assert_eq!(machine.current(), "A");
    assert_eq!(machine.history().depth(), 1);
    assert!(!machine.can_go_back());
    assert!(machine.history().records()[0].is_sentinel());
}

#[test]
fn unknown_event_is_ignored() {
    let machine = abc();

    machine.trigger_event("nonexistent");
    assert_eq!(machine.current(), "A");

    machine.trigger_event("ab");
    machine.trigger_event("nonexistent");
    assert_eq!(machine.current(), "B");
}

#[test]
fn guard_blocks_until_it_admits() {
    let open = Rc::new(Cell::new(false));
    let gate = open.clone();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_transition(Transition::new("go", "A", "B").when(move |_| gate.get()));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");
    assert_eq!(machine.current(), "A");

    open.set(true);
    machine.trigger_event("go");
    assert_eq!(machine.current(), "B");
}

#[test]
fn rejected_guard_skips_before_hook_and_observers() {
    let (before, before_hook) = counter();
    let (started, started_observer) = counter();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_transition(
        Transition::new("go", "A", "B")
            .when(|_| false)
            .before(before_hook),
    );
    machine.when_transition_started(started_observer);
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");

    assert_eq!(before.get(), 0);
    assert_eq!(started.get(), 0);
}

#[test]
fn exit_failure_aborts_to_source() {
    let exit: Slot = Rc::default();
    let (before, before_hook) = counter();
    let (after, after_hook) = counter();
    let (finished, finished_observer) = counter();

    let machine = Machine::new();
    machine.add_state(State::new("A").on_exit(deferred(&exit)));
    machine.add_state(State::new("B"));
    machine.add_transition(
        Transition::new("go", "A", "B")
            .before(before_hook)
            .after(after_hook),
    );
    machine.when_transition_finished(finished_observer);
    machine.set_initial("A");
    machine.start();

    let (outcomes, on_done) = recorder();
    assert!(machine.trigger_event_with("go", on_done));
    assert!(machine.is_transitioning());
    assert_eq!(machine.phase(), Phase::Exiting);

    resolve(&exit, false);

    assert_eq!(machine.current(), "A");
    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 1);
    // The before hook is not rolled back.
    assert_eq!(before.get(), 1);
    assert_eq!(after.get(), 0);
    assert_eq!(finished.get(), 0);
    assert_eq!(
        outcomes.borrow().as_slice(),
        &[Err(TransitionError::ExitFailed {
            state: "A".to_string()
        })]
    );
}

#[test]
fn async_enter_holds_the_lock_until_resolved() {
    let enter: Slot = Rc::default();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B").on_enter(deferred(&enter)));
    machine.add_transition(Transition::new("go", "A", "B"));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");
    assert!(machine.is_transitioning());
    assert_eq!(machine.phase(), Phase::Entering);
    assert_eq!(machine.current(), "A");

    resolve(&enter, true);
    assert!(!machine.is_transitioning());
    assert_eq!(machine.current(), "B");
}

#[test]
fn events_during_flight_are_dropped() {
    let enter: Slot = Rc::default();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B").on_enter(deferred(&enter)));
    machine.add_state(State::new("C"));
    machine.add_transition(Transition::new("go", "A", "B"));
    machine.add_transition(Transition::new("alt", "A", "C"));
    machine.add_transition(Transition::new("go", "B", "C"));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");
    machine.trigger_event("go");
    machine.trigger_event("alt");
    assert!(!machine.try_transition(Transition::new("alt", "A", "C")));
    machine.go_back();

    resolve(&enter, true);
    assert_eq!(machine.current(), "B");
    assert_eq!(machine.history().depth(), 2);
}

#[test]
fn go_back_walks_the_history_stack() {
    let machine = abc();
    machine.trigger_event("ab");
    machine.trigger_event("bc");
    assert_eq!(machine.current(), "C");

    machine.go_back();
    assert_eq!(machine.current(), "B");
    machine.go_back();
    assert_eq!(machine.current(), "A");
    assert!(!machine.can_go_back());

    machine.go_back();
    assert_eq!(machine.current(), "A");
    assert_eq!(machine.history().depth(), 1);
}

#[test]
fn divergent_step_after_go_back_replaces_branch() {
    let machine = abc();
    machine.add_state(State::new("D"));
    machine.add_transition(Transition::new("bd", "B", "D"));

    machine.trigger_event("ab");
    machine.trigger_event("bc");
    machine.go_back();
    machine.trigger_event("bd");

    assert_eq!(machine.current(), "D");
    assert_eq!(machine.history().path(), vec!["A", "B", "D"]);
}

#[test]
fn go_back_is_ignored_while_transitioning() {
    let enter: Slot = Rc::default();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_state(State::new("C").on_enter(deferred(&enter)));
    machine.add_transition(Transition::new("ab", "A", "B"));
    machine.add_transition(Transition::new("bc", "B", "C"));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("ab");
    machine.trigger_event("bc");
    machine.go_back();
    assert_eq!(machine.history().depth(), 2);

    resolve(&enter, true);
    assert_eq!(machine.current(), "C");
    assert_eq!(machine.history().depth(), 3);
}

#[test]
fn failed_go_back_consumes_the_record() {
    let fail_next = Rc::new(Cell::new(false));
    let flag = fail_next.clone();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B").on_enter(move |_, done| done.complete(!flag.get())));
    machine.add_state(State::new("C"));
    machine.add_transition(Transition::new("ab", "A", "B"));
    machine.add_transition(Transition::new("bc", "B", "C"));
    machine.set_initial("A");
    machine.start();
    machine.trigger_event("ab");
    machine.trigger_event("bc");

    fail_next.set(true);
    machine.go_back();

    assert_eq!(machine.current(), "C");
    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 2);

    // The next undo reaches past the failed step.
    machine.go_back();
    assert_eq!(machine.current(), "A");
    assert!(!machine.can_go_back());
}

#[test]
fn go_back_is_hook_free_by_default() {
    let (before, before_hook) = counter();
    let (after, after_hook) = counter();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_transition(
        Transition::new("go", "A", "B")
            .before(before_hook)
            .after(after_hook),
    );
    machine.when_transition_finished(move |ctx| sink.borrow_mut().push(ctx.event.clone()));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");
    machine.go_back();

    assert_eq!(machine.current(), "A");
    assert_eq!(before.get(), 1);
    assert_eq!(after.get(), 1);
    assert_eq!(*events.borrow(), vec!["go".to_string(), BACK_EVENT.to_string()]);
}

#[test]
fn go_back_replays_hooks_but_not_guards_when_configured() {
    let (before, before_hook) = counter();
    let (after, after_hook) = counter();
    let guard_calls = Rc::new(Cell::new(0));
    let guard_count = guard_calls.clone();

    let machine = Machine::with_config(MachineConfig::new().back(BackPolicy::ReplayHooks));
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_transition(
        Transition::new("go", "A", "B")
            .when(move |_| {
                guard_count.set(guard_count.get() + 1);
                true
            })
            .before(before_hook)
            .after(after_hook),
    );
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");
    machine.go_back();

    assert_eq!(machine.current(), "A");
    assert_eq!(before.get(), 2);
    assert_eq!(after.get(), 2);
    assert_eq!(guard_calls.get(), 1);
}

// Enter-failure policy: abort to source (the default).
#[test]
fn enter_failure_aborts_to_source_by_default() {
    let enter: Slot = Rc::default();
    let (finished, finished_observer) = counter();

    let machine = Machine::new();
    assert_eq!(machine.config().enter_failure, EnterFailurePolicy::AbortToSource);
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B").on_enter(deferred(&enter)));
    machine.add_transition(Transition::new("go", "A", "B"));
    machine.when_transition_finished(finished_observer);
    machine.set_initial("A");
    machine.start();

    let (outcomes, on_done) = recorder();
    machine.trigger_event_with("go", on_done);
    resolve(&enter, false);

    assert_eq!(machine.current(), "A");
    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 1);
    assert_eq!(finished.get(), 0);
    assert_eq!(
        outcomes.borrow().as_slice(),
        &[Err(TransitionError::EnterFailed {
            state: "B".to_string()
        })]
    );
}

// Enter-failure policy: commit to destination.
#[test]
fn enter_failure_commits_to_destination_when_configured() {
    let enter: Slot = Rc::default();
    let (finished, finished_observer) = counter();
    let (after, after_hook) = counter();

    let machine = Machine::with_config(
        MachineConfig::new().enter_failure(EnterFailurePolicy::CommitToDestination),
    );
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B").on_enter(deferred(&enter)));
    machine.add_transition(Transition::new("go", "A", "B").after(after_hook));
    machine.when_transition_finished(finished_observer);
    machine.set_initial("A");
    machine.start();

    let (outcomes, on_done) = recorder();
    machine.trigger_event_with("go", on_done);
    resolve(&enter, false);

    assert_eq!(machine.current(), "B");
    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 1);
    assert_eq!(finished.get(), 0);
    assert_eq!(after.get(), 0);
    assert!(outcomes.borrow()[0].is_err());
}

#[test]
fn started_observer_fires_even_when_the_run_fails() {
    let (started, started_observer) = counter();

    let machine = Machine::new();
    machine.add_state(State::new("A").on_exit(|_, done| done.fail()));
    machine.add_state(State::new("B"));
    machine.add_transition(Transition::new("go", "A", "B"));
    machine.when_transition_started(started_observer);
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");

    assert_eq!(started.get(), 1);
    assert_eq!(machine.current(), "A");
}

#[test]
fn hooks_and_observers_run_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let entry = |label: &'static str| {
        let log = log.clone();
        move |_: &cadence::TransitionContext| log.borrow_mut().push(label)
    };
    let exit_log = log.clone();
    let enter_log = log.clone();

    let machine = Machine::new();
    machine.add_state(State::new("A").on_exit(move |_, done| {
        exit_log.borrow_mut().push("exit");
        done.succeed();
    }));
    machine.add_state(State::new("B").on_enter(move |_, done| {
        enter_log.borrow_mut().push("enter");
        done.succeed();
    }));
    machine.add_transition(
        Transition::new("go", "A", "B")
            .before(entry("before"))
            .after(entry("after")),
    );
    machine.when_transition_started(entry("started"));
    machine.when_transition_finished(entry("finished"));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");

    assert_eq!(
        *log.borrow(),
        vec!["started", "before", "exit", "enter", "finished", "after"]
    );
}

#[test]
fn reentrant_trigger_from_hooks_is_dropped() {
    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_state(State::new("C"));
    machine.add_transition(
        Transition::new("go", "A", "B")
            .before(|ctx| ctx.machine.trigger_event("go"))
            .after(|ctx| ctx.machine.trigger_event("next")),
    );
    machine.add_transition(Transition::new("next", "B", "C"));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");

    assert_eq!(machine.current(), "B");
    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 2);
}

#[test]
fn completion_callback_may_chain_the_next_transition() {
    let machine = abc();

    let chained = machine.clone();
    machine.trigger_event_with("ab", move |result| {
        assert!(result.is_ok());
        chained.trigger_event("bc");
    });

    assert_eq!(machine.current(), "C");
    assert_eq!(machine.history().path(), vec!["A", "B", "C"]);
}

#[test]
fn on_after_comes_from_the_admitted_transition() {
    let (registered, registered_hook) = counter();
    let (shadowed, shadowed_hook) = counter();
    let (ad_hoc, ad_hoc_hook) = counter();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_transition(Transition::new("go", "A", "B").after(registered_hook));
    machine.add_transition(Transition::new("go", "A", "B").after(shadowed_hook));
    machine.set_initial("A");
    machine.start();

    assert!(machine.try_transition(Transition::new("go", "A", "B").after(ad_hoc_hook)));

    assert_eq!(machine.current(), "B");
    assert_eq!(ad_hoc.get(), 1);
    assert_eq!(registered.get(), 0);
    assert_eq!(shadowed.get(), 0);
}

#[test]
fn first_registered_transition_shadows_later_ones() {
    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_state(State::new("B"));
    machine.add_state(State::new("C"));
    let first = machine.add_transition(Transition::new("go", "A", "B"));
    let second = machine.add_transition(Transition::new("go", "A", "C"));
    machine.set_initial("A");
    machine.start();

    machine.trigger_event("go");

    assert_ne!(first, second);
    assert_eq!(machine.current(), "B");
}

#[test]
fn unknown_state_is_a_configuration_error() {
    let (started, started_observer) = counter();

    let machine = Machine::new();
    machine.add_state(State::new("A"));
    machine.add_transition(Transition::new("go", "A", "Missing"));
    machine.when_transition_started(started_observer);
    machine.set_initial("A");
    machine.start();

    let (outcomes, on_done) = recorder();
    machine.trigger_event_with("go", on_done);

    assert_eq!(machine.current(), "A");
    assert!(!machine.is_transitioning());
    assert_eq!(started.get(), 0);
    assert_eq!(
        outcomes.borrow().as_slice(),
        &[Err(TransitionError::UnknownState {
            id: "Missing".to_string()
        })]
    );
}

#[test]
fn states_may_be_registered_after_start() {
    let machine = abc();
    machine.add_transition(Transition::new("cd", "C", "D"));
    machine.trigger_event("ab");
    machine.trigger_event("bc");

    machine.trigger_event("cd");
    assert_eq!(machine.current(), "C");

    machine.add_state(State::new("D"));
    machine.trigger_event("cd");
    assert_eq!(machine.current(), "D");
}

#[test]
fn late_completion_after_drop_is_harmless() {
    let enter: Slot = Rc::default();
    {
        let machine = Machine::new();
        machine.add_state(State::new("A"));
        machine.add_state(State::new("B").on_enter(deferred(&enter)));
        machine.add_transition(Transition::new("go", "A", "B"));
        machine.set_initial("A");
        machine.start();
        machine.trigger_event("go");
    }
    // The token only holds a weak reference to the machine.
    resolve(&enter, true);
}

#[test]
fn builder_assembles_a_running_machine() {
    let (finished, finished_observer) = counter();

    let machine = MachineBuilder::new()
        .initial("Draft")
        .states(["Draft", "Review", "Published"])
        .transition(TransitionBuilder::new().on("submit").from("Draft").to("Review"))
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .on("approve")
                    .from("Review")
                    .to("Published"),
            )
        })
        .map(|b| b.on_transition_finished(finished_observer))
        .and_then(|b| b.build())
        .unwrap();

    machine.start();
    machine.trigger_event("submit");
    machine.trigger_event("approve");

    assert_eq!(machine.current(), "Published");
    assert_eq!(finished.get(), 2);
    assert!(machine.validate().is_success());
}

#[test]
fn forward_ping_pong_grows_history_linearly() {
    let machine = Machine::new();
    machine.add_state(State::new("PING"));
    machine.add_state(State::new("PONG"));
    machine.add_transition(Transition::new("DO_PONG", "PING", "PONG"));
    machine.add_transition(Transition::new("DO_PING", "PONG", "PING"));
    machine.set_initial("PING");
    machine.start();

    for _ in 0..50_000 {
        machine.trigger_event("DO_PONG");
        machine.trigger_event("DO_PING");
    }

    assert_eq!(machine.current(), "PING");
    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 100_001);
}

#[test]
fn ping_pong_with_undo_under_load() {
    let machine = Machine::new();
    machine.add_state(State::new("Ping").on_exit(|_, done| done.succeed()));
    machine.add_state(State::new("Pong").on_enter(|_, done| done.succeed()));
    machine.add_transition(Transition::new("hit", "Ping", "Pong"));
    machine.set_initial("Ping");
    machine.start();

    for _ in 0..50_000 {
        machine.trigger_event("hit");
        assert_eq!(machine.current(), "Pong");
        machine.go_back();
        assert_eq!(machine.current(), "Ping");
    }

    assert!(!machine.is_transitioning());
    assert_eq!(machine.history().depth(), 1);
}
