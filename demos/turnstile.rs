//! Coin-operated Turnstile
//!
//! This example drives a turnstile through a simulated tick loop.
//!
//! Key concepts:
//! - States declared up front, transitions loaded from JSON
//! - External events (`Coin`, `Push`) delivered with `send_event`
//! - A state that times itself out from `on_update`
//! - Checkpointing the machine and resuming it on a fresh instance
//!
//! Run with: RUST_LOG=debug cargo run --example turnstile

use fsm_lite::{
    Checkpoint, Context, EmptyState, Machine, MachineBuilder, State, StateBase, TransitionTable,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
enum Gate {
    Locked,
    Unlocked,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
enum Input {
    Coin,
    Push,
    Timeout,
}

const TRANSITIONS: &str = r#"[
    { "from": "Locked", "on": "Coin", "to": "Unlocked" },
    { "from": "Unlocked", "on": "Push", "to": "Locked" },
    { "from": "Unlocked", "on": "Timeout", "to": "Locked" }
]"#;

/// Relocks on its own after a few idle ticks.
struct Unlocked {
    base: StateBase<Gate, Input>,
    ticks_left: u32,
}

impl State<Gate, Input> for Unlocked {
    fn on_enter(&mut self) {
        println!("  [Unlocked] Gate open, 3 ticks to pass");
        self.ticks_left = 3;
    }

    fn on_update(&mut self, ctx: &mut Context<Gate, Input>) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            println!("  [Unlocked] Nobody came through");
            ctx.send_event(Input::Timeout);
        }
    }

    fn on_exit(&mut self) {
        println!("  [Unlocked] Closing gate");
    }

    fn base(&self) -> &StateBase<Gate, Input> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StateBase<Gate, Input> {
        &mut self.base
    }
}

fn build() -> Result<Machine<Gate, Input>, Box<dyn std::error::Error>> {
    let table: TransitionTable<Gate, Input> = TransitionTable::from_json(TRANSITIONS)?;
    let machine = MachineBuilder::new()
        .state(Gate::Locked, EmptyState::new())
        .state(
            Gate::Unlocked,
            Unlocked {
                base: StateBase::new(),
                ticks_left: 0,
            },
        )
        .transitions(table)
        .build()?;
    Ok(machine)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Turnstile ===\n");

    let mut machine = build()?;
    machine.set(Gate::Locked)?;

    let script = [
        Some(Input::Push),
        Some(Input::Coin),
        None,
        Some(Input::Push),
        Some(Input::Coin),
        None,
        None,
        None,
    ];

    for (tick, input) in script.into_iter().enumerate() {
        if let Some(input) = input {
            println!("tick {tick}: {input:?}");
            machine.send_event(input)?;
        } else {
            println!("tick {tick}: (idle)");
        }
        machine.update()?;
        println!("  -> {:?}", machine.current_state_id());
    }

    let json = machine.checkpoint().to_json_pretty()?;
    println!("\nCheckpoint:\n{json}\n");

    let mut resumed = build()?;
    resumed.resume(&Checkpoint::from_json(&json)?)?;
    println!(
        "Resumed machine is {:?} after {} transitions",
        resumed.current_state_id(),
        resumed.history().len()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
