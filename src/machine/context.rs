//! Handle given to a state while it is being updated.

use crate::core::MachineId;

/// A transition a state asked for from inside `on_update`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Request<S, E> {
    Set(S),
    SendEvent(E),
}

/// Lets the current state drive its own machine from `on_update`.
///
/// Requests are queued and applied by the machine in the order they were
/// made, right after `on_update` returns, with the same semantics as
/// calling `Machine::set` / `Machine::send_event` directly.
#[derive(Debug)]
pub struct Context<S, E> {
    machine: MachineId,
    current: S,
    requests: Vec<Request<S, E>>,
}

impl<S, E> Context<S, E> {
    pub(crate) fn new(machine: MachineId, current: S) -> Self {
        Self {
            machine,
            current,
            requests: Vec::new(),
        }
    }

    /// The machine running this update.
    pub fn machine(&self) -> MachineId {
        self.machine
    }

    /// Id of the state being updated.
    pub fn current_state_id(&self) -> &S {
        &self.current
    }

    /// Queue an event for the machine.
    pub fn send_event(&mut self, event: E) {
        self.requests.push(Request::SendEvent(event));
    }

    /// Queue a forced transition to `id`.
    pub fn set(&mut self, id: S) {
        self.requests.push(Request::Set(id));
    }

    /// Whether any request has been queued so far.
    pub fn has_pending(&self) -> bool {
        !self.requests.is_empty()
    }

    pub(crate) fn into_requests(self) -> Vec<Request<S, E>> {
        self.requests
    }
}
