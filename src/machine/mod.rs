//! The state registry and transition dispatch.

mod context;

pub use context::Context;

use crate::builder::TransitionTable;
use crate::core::{
    EventId, FsmError, FsmResult, MachineId, State, StateHistory, StateId, StateTransition,
};
use chrono::Utc;
use context::Request;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

/// Finite state machine owning a fixed set of id-addressed states.
///
/// Exactly one state is current once [`Machine::set`] has been called, and
/// it stays that way for the life of the machine. Dropping the machine drops
/// its states without calling `on_exit`.
///
/// # Example
///
/// ```rust
/// use fsm_lite::{EmptyState, Machine};
///
/// let mut machine: Machine<&str, &str> = Machine::new();
/// machine
///     .register("idle", EmptyState::with_transitions([("start", "running")]).unwrap())
///     .unwrap();
/// machine
///     .register("running", EmptyState::with_transitions([("stop", "idle")]).unwrap())
///     .unwrap();
///
/// machine.set("idle").unwrap();
/// machine.send_event("start").unwrap();
/// assert_eq!(machine.current_state_id(), Some(&"running"));
///
/// // Events the current state has no transition for are ignored.
/// machine.send_event("jump").unwrap();
/// assert_eq!(machine.current_state_id(), Some(&"running"));
/// ```
pub struct Machine<S: StateId, E: EventId> {
    id: MachineId,
    states: HashMap<S, Box<dyn State<S, E>>>,
    current: Option<S>,
    history: StateHistory<S, E>,
}

impl<S: StateId, E: EventId> Machine<S, E> {
    /// Create an empty machine with a fresh [`MachineId`].
    pub fn new() -> Self {
        Self {
            id: MachineId::new(),
            states: HashMap::new(),
            current: None,
            history: StateHistory::new(),
        }
    }

    /// The handle every registered state is bound to.
    pub fn id(&self) -> MachineId {
        self.id
    }

    /// Register `state` under `id` and bind it to this machine.
    ///
    /// Never changes the current state.
    pub fn register<T>(&mut self, id: S, state: T) -> FsmResult<(), S, E>
    where
        T: State<S, E> + 'static,
    {
        self.register_boxed(id, Box::new(state))
    }

    /// Register an already boxed state. See [`Machine::register`].
    pub fn register_boxed(
        &mut self,
        id: S,
        mut state: Box<dyn State<S, E>>,
    ) -> FsmResult<(), S, E> {
        if self.states.contains_key(&id) {
            return Err(FsmError::DuplicateStateId(id));
        }
        state.base_mut().bind(self.id)?;

        debug!(machine = %self.id, state = ?id, "Registered state");
        self.states.insert(id, state);
        Ok(())
    }

    /// Make `id` the current state.
    ///
    /// Calls `on_exit` on the previous state (if any), moves the current
    /// pointer, then calls `on_enter` on the new state. Fails with
    /// [`FsmError::UnknownStateId`] without touching anything if `id` was
    /// never registered.
    pub fn set(&mut self, id: S) -> FsmResult<(), S, E> {
        self.transition_to(id, None)
    }

    /// Deliver `event` to the current state.
    ///
    /// If the current state has a transition for it, behaves like
    /// [`Machine::set`] on the target. Otherwise nothing happens.
    pub fn send_event(&mut self, event: E) -> FsmResult<(), S, E> {
        let current = self.current.as_ref().ok_or(FsmError::NoActiveState)?;
        let next = self
            .states
            .get(current)
            .and_then(|state| state.next_state_id_for_event(&event))
            .cloned();

        match next {
            Some(next) => self.transition_to(next, Some(event)),
            None => {
                trace!(machine = %self.id, state = ?self.current, event = ?event, "Event not handled");
                Ok(())
            }
        }
    }

    /// Tick the current state.
    ///
    /// Calls `on_update` exactly once, then applies whatever the state
    /// queued on its [`Context`], in order. The whole queue is checked
    /// against the transition tables as they stand when `on_update` returns
    /// before any of it is applied: if one request would fail, none are
    /// applied and that request's error is returned.
    pub fn update(&mut self) -> FsmResult<(), S, E> {
        let current = self.current.clone().ok_or(FsmError::NoActiveState)?;
        let mut ctx = Context::new(self.id, current);

        if let Some(state) = self.states.get_mut(ctx.current_state_id()) {
            state.on_update(&mut ctx);
        }
        trace!(machine = %self.id, state = ?ctx.current_state_id(), "Updated state");

        let requests = ctx.into_requests();
        if let Err(err) = self.check_requests(&requests) {
            warn!(machine = %self.id, error = %err, "Rejected requests queued during update");
            return Err(err);
        }
        for request in requests {
            match request {
                Request::Set(id) => self.set(id)?,
                Request::SendEvent(event) => self.send_event(event)?,
            }
        }
        Ok(())
    }

    /// The current state, or `None` before the first `set`.
    pub fn current_state(&self) -> Option<&dyn State<S, E>> {
        self.current
            .as_ref()
            .and_then(|id| self.states.get(id))
            .map(|state| state.as_ref() as &dyn State<S, E>)
    }

    /// Id of the current state, or `None` before the first `set`.
    pub fn current_state_id(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// The state registered under `id`, current or not.
    pub fn state(&self, id: &S) -> Option<&dyn State<S, E>> {
        self.states
            .get(id)
            .map(|state| state.as_ref() as &dyn State<S, E>)
    }

    /// Mutable access to the state registered under `id`, e.g. to add
    /// transitions after registration. Does not call any hook.
    pub fn state_mut(&mut self, id: &S) -> Option<&mut dyn State<S, E>> {
        self.states
            .get_mut(id)
            .map(|state| state.as_mut() as &mut dyn State<S, E>)
    }

    /// Whether a state is registered under `id`.
    pub fn contains(&self, id: &S) -> bool {
        self.states.contains_key(id)
    }

    /// Registered state ids, in no particular order.
    pub fn state_ids(&self) -> impl Iterator<Item = &S> {
        self.states.keys()
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every transition taken so far, oldest first.
    pub fn history(&self) -> &StateHistory<S, E> {
        &self.history
    }

    /// Keep only the `limit` most recent transitions in history, or all of
    /// them with `None` (the default). Shrinking drops the oldest ones.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fsm_lite::{EmptyState, Machine};
    ///
    /// let mut machine: Machine<u8, ()> = Machine::new();
    /// machine.register(0, EmptyState::new()).unwrap();
    /// machine.set_history_limit(Some(8));
    ///
    /// for _ in 0..100 {
    ///     machine.set(0).unwrap();
    /// }
    /// assert_eq!(machine.history().len(), 8);
    /// ```
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.history.set_limit(limit);
    }

    /// The history retention limit, `None` when unbounded.
    pub fn history_limit(&self) -> Option<usize> {
        self.history.limit()
    }

    /// Transitions whose target was never registered, as `(from, event, to)`.
    ///
    /// Registration does not check targets; call this once setup is done to
    /// catch edges that would fail with [`FsmError::UnknownStateId`] when taken.
    pub fn unresolved_transitions(&self) -> Vec<(S, E, S)> {
        let states = &self.states;
        states
            .iter()
            .flat_map(|(from, state)| {
                state
                    .base()
                    .transitions()
                    .filter(move |(_, to)| !states.contains_key(*to))
                    .map(move |(event, to)| (from.clone(), event.clone(), to.clone()))
            })
            .collect()
    }

    /// Add every row of `table` to its `from` state.
    ///
    /// The whole table is checked first: an unregistered `from` fails with
    /// [`FsmError::UnknownStateId`], an event defined twice for one state
    /// (in the table or already on the state) fails with
    /// [`FsmError::DuplicateTransition`]. A failing table changes nothing.
    pub fn apply_table(&mut self, table: &TransitionTable<S, E>) -> FsmResult<(), S, E> {
        let mut seen = HashSet::new();
        for row in table.rows() {
            let state = self
                .states
                .get(&row.from)
                .ok_or_else(|| FsmError::UnknownStateId(row.from.clone()))?;
            let taken = state.next_state_id_for_event(&row.on).is_some();
            if taken || !seen.insert((&row.from, &row.on)) {
                return Err(FsmError::DuplicateTransition {
                    event: row.on.clone(),
                });
            }
        }

        for row in table.rows() {
            if let Some(state) = self.states.get_mut(&row.from) {
                state.add_transition(row.on.clone(), row.to.clone())?;
            }
        }
        debug!(machine = %self.id, rows = table.len(), "Applied transition table");
        Ok(())
    }

    /// Replace the current state and history wholesale.
    ///
    /// Runs the same exit/enter sequence as `set` but records nothing; the
    /// supplied history becomes the machine's history, trimmed to this
    /// machine's limit. Every id in `current` and `history` must be
    /// registered, otherwise nothing changes.
    pub(crate) fn restore(
        &mut self,
        current: Option<S>,
        history: StateHistory<S, E>,
    ) -> FsmResult<(), S, E> {
        let named = history
            .transitions()
            .flat_map(|t| t.from.iter().chain(std::iter::once(&t.to)))
            .chain(current.iter());
        for id in named {
            if !self.states.contains_key(id) {
                return Err(FsmError::UnknownStateId(id.clone()));
            }
        }

        if let Some(id) = current {
            self.switch_to(id);
        }
        let limit = self.history.limit();
        self.history = history;
        self.history.set_limit(limit);
        Ok(())
    }

    /// Dry-run `requests` from the current state without touching anything.
    fn check_requests(&self, requests: &[Request<S, E>]) -> FsmResult<(), S, E> {
        let mut current = self.current.as_ref();
        for request in requests {
            let target = match request {
                Request::Set(id) => Some(id),
                Request::SendEvent(event) => {
                    let id = current.ok_or(FsmError::NoActiveState)?;
                    self.states
                        .get(id)
                        .and_then(|state| state.next_state_id_for_event(event))
                }
            };
            if let Some(target) = target {
                let (target, _) = self
                    .states
                    .get_key_value(target)
                    .ok_or_else(|| FsmError::UnknownStateId(target.clone()))?;
                current = Some(target);
            }
        }
        Ok(())
    }

    fn transition_to(&mut self, id: S, event: Option<E>) -> FsmResult<(), S, E> {
        if !self.states.contains_key(&id) {
            return Err(FsmError::UnknownStateId(id));
        }

        let from = self.switch_to(id.clone());
        debug!(machine = %self.id, from = ?from, to = ?id, event = ?event, "State transition");

        self.history.push(StateTransition {
            from,
            to: id,
            event,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Exit the current state, move the pointer, enter `id`.
    ///
    /// `id` must be registered. Returns the previous current id.
    fn switch_to(&mut self, id: S) -> Option<S> {
        if let Some(old) = &self.current {
            if let Some(state) = self.states.get_mut(old) {
                state.on_exit();
            }
        }

        let previous = self.current.replace(id);

        if let Some(new) = &self.current {
            if let Some(state) = self.states.get_mut(new) {
                state.on_enter();
            }
        }
        previous
    }
}

impl<S: StateId, E: EventId> Default for Machine<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, E: EventId> fmt::Debug for Machine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("history", &self.history.len())
            .finish()
    }
}
