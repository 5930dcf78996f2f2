//! Core state machine types.
//!
//! This module contains the building blocks every machine is made of:
//! - The identifier contract (`StateId`, `EventId`, `MachineId`)
//! - The `State` trait and the `StateBase` storage behind it
//! - The error taxonomy shared by every operation
//! - Transition history tracking

mod error;
mod history;
mod id;
mod state;

pub use error::{FsmError, FsmResult};
pub use history::{StateHistory, StateTransition};
pub use id::{EventId, MachineId, StateId};
pub use state::{EmptyState, State, StateBase};
