//! Wizard Flow
//!
//! This example drives a three-step signup wizard whose screens fade in and
//! out asynchronously.
//!
//! Key concepts:
//! - Async `on_enter`/`on_exit` actions backed by tokio timers
//! - Guards that read application data
//! - Observers standing in for a presentation layer
//! - Undo with `go_back`, and events dropped while a fade is running
//!
//! Run with: cargo run --example wizard_flow --features tokio-integration

use cadence::tokio_utils::{async_action, delayed};
use cadence::{Done, Machine, MachineBuilder, State, Transition, TransitionContext};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;

const FADE: Duration = Duration::from_millis(150);

fn fade_in(screen: &'static str) -> impl Fn(&Machine, Done) + 'static {
    async_action(move |_| async move {
        println!("  fading in {screen}");
        tokio::time::sleep(FADE).await;
        true
    })
}

async fn settle(machine: &Machine) {
    while machine.is_transitioning() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let email = Rc::new(RefCell::new(String::new()));
    let typed = email.clone();

    let machine = MachineBuilder::new()
        .initial("Welcome")
        .state(State::new("Welcome").on_exit(delayed(FADE, true)))
        .state(
            State::new("Details")
                .on_enter(fade_in("Details"))
                .on_exit(delayed(FADE, true)),
        )
        .state(State::new("Confirm").on_enter(fade_in("Confirm")))
        .add_transition(Transition::new("next", "Welcome", "Details"))
        .add_transition(
            Transition::new("next", "Details", "Confirm")
                .when(move |_| typed.borrow().contains('@'))
                .before(|ctx| println!("  submitting details ({})", ctx.event)),
        )
        .on_transition_started(|ctx: &TransitionContext| {
            println!("→ {} -> {} on '{}'", ctx.from_state, ctx.to_state, ctx.event)
        })
        .on_transition_finished(|ctx: &TransitionContext| {
            println!("✓ showing {} after {:?}", ctx.to_state, ctx.elapsed())
        })
        .build()?;

    let issues = machine.config_issues();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config issue: {issue}");
        }
        return Err(format!("{} configuration issue(s)", issues.len()).into());
    }

    machine.start();
    println!("Started on {}\n", machine.current());

    println!("Step 1: next (a second click during the fade is ignored)");
    machine.trigger_event("next");
    machine.trigger_event("next");
    settle(&machine).await;
    println!("Now on {}\n", machine.current());

    println!("Step 2: next without an email (guard rejects)");
    machine.trigger_event("next");
    println!("Still on {}\n", machine.current());

    println!("Step 3: enter an email and continue");
    *email.borrow_mut() = "ada@example.com".to_string();
    machine.trigger_event("next");
    settle(&machine).await;
    println!("Now on {}\n", machine.current());

    println!("Step 4: back, twice");
    while machine.can_go_back() {
        machine.go_back();
        settle(&machine).await;
        println!("Back on {}", machine.current());
    }

    println!("\nHistory:");
    for record in machine.history().records() {
        println!("  {} -> {} ({})", record.from, record.to, record.event);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Wizard Flow ===\n");

    LocalSet::new().run_until(run()).await?;

    println!("\n=== Example Complete ===");
    Ok(())
}
