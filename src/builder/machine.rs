//! Builder for constructing machines.

use crate::builder::table::TransitionTable;
use crate::core::{EventId, FsmResult, State, StateId};
use crate::machine::Machine;

/// Builder for constructing machines with a fluent API.
///
/// States are registered in the order they were added, then every
/// transition table is applied, then the initial state (if any) is set.
///
/// # Example
///
/// ```rust
/// use fsm_lite::{EmptyState, MachineBuilder, TransitionTable};
///
/// let machine = MachineBuilder::<&str, &str>::new()
///     .state("idle", EmptyState::new())
///     .state("running", EmptyState::new())
///     .transitions(
///         TransitionTable::new()
///             .row("idle", "start", "running")
///             .row("running", "stop", "idle"),
///     )
///     .initial("idle")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state_id(), Some(&"idle"));
/// ```
pub struct MachineBuilder<S: StateId, E: EventId> {
    states: Vec<(S, Box<dyn State<S, E>>)>,
    tables: Vec<TransitionTable<S, E>>,
    initial: Option<S>,
    history_limit: Option<usize>,
}

impl<S: StateId, E: EventId> MachineBuilder<S, E> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            tables: Vec::new(),
            initial: None,
            history_limit: None,
        }
    }

    /// Add a state under `id`.
    pub fn state<T>(self, id: S, state: T) -> Self
    where
        T: State<S, E> + 'static,
    {
        self.boxed_state(id, Box::new(state))
    }

    /// Add an already boxed state under `id`.
    pub fn boxed_state(mut self, id: S, state: Box<dyn State<S, E>>) -> Self {
        self.states.push((id, state));
        self
    }

    /// Add a transition table, applied once every state is registered.
    pub fn transitions(mut self, table: TransitionTable<S, E>) -> Self {
        self.tables.push(table);
        self
    }

    /// Set the state entered at the end of `build` (optional).
    pub fn initial(mut self, id: S) -> Self {
        self.initial = Some(id);
        self
    }

    /// Keep only the `limit` most recent transitions in history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Build the machine.
    ///
    /// Returns the first registration, table or initial `set` error.
    pub fn build(self) -> FsmResult<Machine<S, E>, S, E> {
        let mut machine = Machine::new();
        machine.set_history_limit(self.history_limit);
        for (id, state) in self.states {
            machine.register_boxed(id, state)?;
        }
        for table in &self.tables {
            machine.apply_table(table)?;
        }
        if let Some(id) = self.initial {
            machine.set(id)?;
        }
        Ok(machine)
    }
}

impl<S: StateId, E: EventId> Default for MachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EmptyState, FsmError};

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Idle,
        Running,
        Done,
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestEvent {
        Start,
        Finish,
    }

    fn table() -> TransitionTable<TestState, TestEvent> {
        TransitionTable::new()
            .row(TestState::Idle, TestEvent::Start, TestState::Running)
            .row(TestState::Running, TestEvent::Finish, TestState::Done)
    }

    #[test]
    fn history_limit_applies_from_initial_state() {
        let mut machine = MachineBuilder::new()
            .state(TestState::Idle, EmptyState::new())
            .state(TestState::Running, EmptyState::new())
            .state(TestState::Done, EmptyState::new())
            .transitions(table())
            .history_limit(1)
            .initial(TestState::Idle)
            .build()
            .unwrap();

        machine.send_event(TestEvent::Start).unwrap();
        machine.send_event(TestEvent::Finish).unwrap();

        assert_eq!(machine.history_limit(), Some(1));
        assert_eq!(
            machine.history().get_path(),
            vec![&TestState::Running, &TestState::Done]
        );
    }

    #[test]
    fn builds_without_initial_state() {
        let machine = MachineBuilder::<TestState, TestEvent>::new()
            .state(TestState::Idle, EmptyState::new())
            .build()
            .unwrap();

        assert!(machine.current_state().is_none());
        assert_eq!(machine.len(), 1);
    }

    #[test]
    fn fluent_api_builds_machine() {
        let mut machine = MachineBuilder::new()
            .state(TestState::Idle, EmptyState::new())
            .state(TestState::Running, EmptyState::new())
            .state(TestState::Done, EmptyState::new())
            .transitions(table())
            .initial(TestState::Idle)
            .build()
            .unwrap();

        machine.send_event(TestEvent::Start).unwrap();
        machine.send_event(TestEvent::Finish).unwrap();

        assert_eq!(machine.current_state_id(), Some(&TestState::Done));
        assert_eq!(
            machine.history().get_path(),
            vec![&TestState::Idle, &TestState::Running, &TestState::Done]
        );
    }

    #[test]
    fn builder_reports_duplicate_states() {
        let result = MachineBuilder::<TestState, TestEvent>::new()
            .state(TestState::Idle, EmptyState::new())
            .state(TestState::Idle, EmptyState::new())
            .build();

        assert!(matches!(
            result,
            Err(FsmError::DuplicateStateId(TestState::Idle))
        ));
    }

    #[test]
    fn builder_reports_unknown_initial_state() {
        let result = MachineBuilder::<TestState, TestEvent>::new()
            .state(TestState::Idle, EmptyState::new())
            .initial(TestState::Running)
            .build();

        assert!(matches!(
            result,
            Err(FsmError::UnknownStateId(TestState::Running))
        ));
    }

    #[test]
    fn builder_reports_table_for_missing_state() {
        let result = MachineBuilder::new()
            .state(TestState::Idle, EmptyState::new())
            .state(TestState::Running, EmptyState::new())
            .transitions(table())
            .build();

        // Targets may be missing, sources may not.
        assert!(result.is_ok());

        let result = MachineBuilder::new()
            .state(TestState::Idle, EmptyState::new())
            .transitions(table())
            .build();

        assert!(matches!(
            result,
            Err(FsmError::UnknownStateId(TestState::Running))
        ));
    }
}
