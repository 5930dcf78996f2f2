//! Errors raised by machine and state operations.

use super::id::MachineId;
use thiserror::Error;

/// Errors that can occur while configuring or driving a machine.
///
/// None of these corrupt the machine: when an operation fails, the registry,
/// the current state and the history are exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError<S, E> {
    /// A state was registered under an id that is already taken.
    #[error("State id {0:?} is already registered")]
    DuplicateStateId(S),

    /// A state already has a transition for this event.
    #[error("Transition for event {event:?} is already defined on this state")]
    DuplicateTransition { event: E },

    /// The target id was never registered with the machine.
    #[error("State id {0:?} is not registered")]
    UnknownStateId(S),

    /// `update` or `send_event` was called before the first `set`.
    #[error("No active state. Call .set(id) before .update() or .send_event(event)")]
    NoActiveState,

    /// The state is already bound to a machine.
    #[error("State is already bound to machine {machine}")]
    AlreadyBound { machine: MachineId },
}

/// Result alias for machine and state operations.
pub type FsmResult<T, S, E> = Result<T, FsmError<S, E>>;
