//! The `State` trait and the base storage every state carries.

use super::error::{FsmError, FsmResult};
use super::id::{EventId, MachineId, StateId};
use crate::machine::Context;
use std::collections::HashMap;
use std::fmt::{self, Debug};

/// Transition table and machine binding shared by every state.
///
/// Concrete states embed one of these and hand it out through
/// [`State::base`] / [`State::base_mut`]. The provided methods on [`State`]
/// delegate here.
#[derive(Clone)]
pub struct StateBase<S, E> {
    transitions: HashMap<E, S>,
    machine: Option<MachineId>,
}

impl<S: StateId, E: EventId> StateBase<S, E> {
    /// Create a base with no transitions, bound to no machine.
    pub fn new() -> Self {
        Self {
            transitions: HashMap::new(),
            machine: None,
        }
    }

    /// Record that `event` moves the machine to `next` while this state is active.
    ///
    /// Fails with [`FsmError::DuplicateTransition`] if `event` already has a
    /// transition; the table is left unchanged.
    pub fn add_transition(&mut self, event: E, next: S) -> FsmResult<(), S, E> {
        if self.transitions.contains_key(&event) {
            return Err(FsmError::DuplicateTransition { event });
        }
        self.transitions.insert(event, next);
        Ok(())
    }

    /// Look up the state `event` leads to. Pure.
    pub fn next_state_id_for_event(&self, event: &E) -> Option<&S> {
        self.transitions.get(event)
    }

    /// The machine this state was registered with, if any.
    pub fn machine(&self) -> Option<MachineId> {
        self.machine
    }

    /// Outgoing transitions as `(event, target)` pairs, in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (&E, &S)> {
        self.transitions.iter()
    }

    /// Number of outgoing transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Bind to `machine`. Only the registry calls this, and only once.
    pub(crate) fn bind(&mut self, machine: MachineId) -> FsmResult<(), S, E> {
        match self.machine {
            Some(bound) => Err(FsmError::AlreadyBound { machine: bound }),
            None => {
                self.machine = Some(machine);
                Ok(())
            }
        }
    }
}

impl<S: StateId, E: EventId> Default for StateBase<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Debug, E: Debug> Debug for StateBase<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBase")
            .field("transitions", &self.transitions)
            .field("machine", &self.machine)
            .finish()
    }
}

/// A unit of behavior driven by a [`Machine`](crate::Machine).
///
/// The three lifecycle hooks have no default bodies: every state decides
/// what entering, ticking and leaving mean for it, even when the answer is
/// "nothing". Use [`EmptyState`] when all three really are no-ops.
///
/// # Example
///
/// ```rust
/// use fsm_lite::{Context, Machine, State, StateBase};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Light { Green, Red }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Signal { Timer }
///
/// struct Timed {
///     base: StateBase<Light, Signal>,
///     ticks_left: u32,
///     duration: u32,
/// }
///
/// impl State<Light, Signal> for Timed {
///     fn on_enter(&mut self) {
///         self.ticks_left = self.duration;
///     }
///
///     fn on_update(&mut self, ctx: &mut Context<Light, Signal>) {
///         self.ticks_left -= 1;
///         if self.ticks_left == 0 {
///             ctx.send_event(Signal::Timer);
///         }
///     }
///
///     fn on_exit(&mut self) {}
///
///     fn base(&self) -> &StateBase<Light, Signal> { &self.base }
///     fn base_mut(&mut self) -> &mut StateBase<Light, Signal> { &mut self.base }
/// }
///
/// let mut green = Timed { base: StateBase::new(), ticks_left: 0, duration: 2 };
/// green.add_transition(Signal::Timer, Light::Red).unwrap();
/// let red = Timed { base: StateBase::new(), ticks_left: 0, duration: 1 };
///
/// let mut machine = Machine::new();
/// machine.register(Light::Green, green).unwrap();
/// machine.register(Light::Red, red).unwrap();
/// machine.set(Light::Green).unwrap();
///
/// machine.update().unwrap();
/// assert_eq!(machine.current_state_id(), Some(&Light::Green));
/// machine.update().unwrap();
/// assert_eq!(machine.current_state_id(), Some(&Light::Red));
/// ```
pub trait State<S: StateId, E: EventId> {
    /// Called when this state becomes current.
    fn on_enter(&mut self);

    /// Called once per `Machine::update` while this state is current.
    ///
    /// Transitions requested through `ctx` are applied by the machine, in
    /// order, as soon as this hook returns.
    fn on_update(&mut self, ctx: &mut Context<S, E>);

    /// Called when this state stops being current.
    fn on_exit(&mut self);

    fn base(&self) -> &StateBase<S, E>;

    fn base_mut(&mut self) -> &mut StateBase<S, E>;

    /// See [`StateBase::add_transition`].
    fn add_transition(&mut self, event: E, next: S) -> FsmResult<(), S, E> {
        self.base_mut().add_transition(event, next)
    }

    /// See [`StateBase::next_state_id_for_event`].
    fn next_state_id_for_event(&self, event: &E) -> Option<&S> {
        self.base().next_state_id_for_event(event)
    }

    /// See [`StateBase::machine`].
    fn machine(&self) -> Option<MachineId> {
        self.base().machine()
    }
}

/// A state whose lifecycle hooks all do nothing.
///
/// Useful for pass-through states that exist only to route events.
#[derive(Clone, Debug)]
pub struct EmptyState<S, E> {
    base: StateBase<S, E>,
}

impl<S: StateId, E: EventId> EmptyState<S, E> {
    /// Create an unbound state with no transitions.
    pub fn new() -> Self {
        Self {
            base: StateBase::new(),
        }
    }

    /// Wrap an existing base, transitions and binding included.
    pub fn with_base(base: StateBase<S, E>) -> Self {
        Self { base }
    }

    /// Create an empty state with the given `(event, target)` transitions.
    pub fn with_transitions<I>(transitions: I) -> FsmResult<Self, S, E>
    where
        I: IntoIterator<Item = (E, S)>,
    {
        let mut state = Self::new();
        for (event, next) in transitions {
            state.base.add_transition(event, next)?;
        }
        Ok(state)
    }
}

impl<S: StateId, E: EventId> Default for EmptyState<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, E: EventId> State<S, E> for EmptyState<S, E> {
    fn on_enter(&mut self) {}

    fn on_update(&mut self, _ctx: &mut Context<S, E>) {}

    fn on_exit(&mut self) {}

    fn base(&self) -> &StateBase<S, E> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StateBase<S, E> {
        &mut self.base
    }
}
