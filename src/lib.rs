//! fsm-lite: a minimal finite state machine
//!
//! A [`Machine`] owns a fixed set of states addressed by id and drives
//! exactly one of them at a time through `on_enter` / `on_update` /
//! `on_exit`. States declare their outgoing transitions as
//! `event -> state id` pairs; the machine follows them when an event is sent.
//!
//! # Core Concepts
//!
//! - **State**: behavior behind the [`State`] trait, plus a [`StateBase`]
//!   holding its transitions and machine binding
//! - **Machine**: the registry and the single current state
//! - **Context**: handed to `on_update` so a state can drive its own machine
//! - **History**: every transition the machine has taken
//!
//! # Example
//!
//! ```rust
//! use fsm_lite::{EmptyState, Machine, State};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Mode { Idle, Running }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Input { Start, Stop, Jump }
//!
//! let mut idle = EmptyState::new();
//! idle.add_transition(Input::Start, Mode::Running).unwrap();
//! let mut running = EmptyState::new();
//! running.add_transition(Input::Stop, Mode::Idle).unwrap();
//!
//! let mut machine = Machine::new();
//! machine.register(Mode::Idle, idle).unwrap();
//! machine.register(Mode::Running, running).unwrap();
//! machine.set(Mode::Idle).unwrap();
//!
//! machine.send_event(Input::Start).unwrap();
//! assert_eq!(machine.current_state_id(), Some(&Mode::Running));
//!
//! machine.send_event(Input::Jump).unwrap();
//! assert_eq!(machine.current_state_id(), Some(&Mode::Running));
//!
//! machine.send_event(Input::Stop).unwrap();
//! assert_eq!(machine.current_state_id(), Some(&Mode::Idle));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{MachineBuilder, TransitionRow, TransitionTable};
pub use checkpoint::{Checkpoint, CheckpointError, StateEntry, CHECKPOINT_VERSION};
pub use core::{
    EmptyState, EventId, FsmError, FsmResult, MachineId, State, StateBase, StateHistory, StateId,
    StateTransition,
};
pub use machine::{Context, Machine};
