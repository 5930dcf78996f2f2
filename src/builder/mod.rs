//! Builder API for machine construction.
//!
//! `MachineBuilder` collects states, transition tables and an optional
//! initial state, and reports every configuration error from `build`.
//! `TransitionTable` describes transitions as data, so they can be loaded
//! from JSON instead of written out in code.

pub mod machine;
pub mod table;

pub use machine::MachineBuilder;
pub use table::{TransitionRow, TransitionTable};
