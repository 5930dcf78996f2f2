//! Property-based tests for machine dispatch.
//!
//! These tests use proptest to drive a fully connected machine with
//! random operation sequences and check the invariants hold after each step.

use fsm_lite::{Context, FsmError, Machine, State, StateBase};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const STATES: u8 = 4;
const EVENTS: u8 = 4;

#[derive(Clone, Debug)]
enum Op {
    Set(u8),
    Send(u8),
    Update,
}

type Log = Rc<RefCell<Vec<(u8, &'static str)>>>;

struct Tracked {
    id: u8,
    log: Log,
    base: StateBase<u8, u8>,
}

impl State<u8, u8> for Tracked {
    fn on_enter(&mut self) {
        self.log.borrow_mut().push((self.id, "enter"));
    }

    fn on_update(&mut self, _ctx: &mut Context<u8, u8>) {
        self.log.borrow_mut().push((self.id, "update"));
    }

    fn on_exit(&mut self) {
        self.log.borrow_mut().push((self.id, "exit"));
    }

    fn base(&self) -> &StateBase<u8, u8> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StateBase<u8, u8> {
        &mut self.base
    }
}

/// State `s` moves to `(s + e) % STATES` on event `e`, except that the last
/// event is never handled.
fn machine(log: &Log) -> Machine<u8, u8> {
    let mut machine = Machine::new();
    for id in 0..STATES {
        let mut state = Tracked {
            id,
            log: Rc::clone(log),
            base: StateBase::new(),
        };
        for event in 0..EVENTS - 1 {
            state.add_transition(event, (id + event) % STATES).unwrap();
        }
        machine.register(id, state).unwrap();
    }
    machine
}

/// Queues the same requests from every `on_update`.
struct Scripted {
    script: Rc<Vec<Op>>,
    base: StateBase<u8, u8>,
}

impl State<u8, u8> for Scripted {
    fn on_enter(&mut self) {}

    fn on_update(&mut self, ctx: &mut Context<u8, u8>) {
        for op in self.script.iter() {
            match *op {
                Op::Set(id) => ctx.set(id),
                Op::Send(event) => ctx.send_event(event),
                Op::Update => {}
            }
        }
    }

    fn on_exit(&mut self) {}

    fn base(&self) -> &StateBase<u8, u8> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StateBase<u8, u8> {
        &mut self.base
    }
}

/// Same transitions as `machine`, every state running `script` on update.
fn scripted_machine(script: &[Op]) -> Machine<u8, u8> {
    let script = Rc::new(script.to_vec());
    let mut machine = Machine::new();
    for id in 0..STATES {
        let mut state = Scripted {
            script: Rc::clone(&script),
            base: StateBase::new(),
        };
        for event in 0..EVENTS - 1 {
            state.add_transition(event, (id + event) % STATES).unwrap();
        }
        machine.register(id, state).unwrap();
    }
    machine
}

prop_compose! {
    fn arbitrary_op()(kind in 0..3u8, value in 0..(STATES + 2)) -> Op {
        match kind {
            0 => Op::Set(value),
            1 => Op::Send(value % EVENTS),
            _ => Op::Update,
        }
    }
}

proptest! {
    #[test]
    fn operations_follow_the_contract(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let log = Log::default();
        let mut machine = machine(&log);
        let mut expected: Option<u8> = None;

        for op in ops {
            log.borrow_mut().clear();
            let before = machine.history().len();

            match op {
                Op::Set(id) => {
                    let result = machine.set(id);
                    if id < STATES {
                        prop_assert!(result.is_ok());
                        let mut calls = Vec::new();
                        if let Some(old) = expected {
                            calls.push((old, "exit"));
                        }
                        calls.push((id, "enter"));
                        prop_assert_eq!(&*log.borrow(), &calls);
                        expected = Some(id);
                    } else {
                        prop_assert_eq!(result, Err(FsmError::UnknownStateId(id)));
                        prop_assert!(log.borrow().is_empty());
                    }
                }
                Op::Send(event) => {
                    let result = machine.send_event(event);
                    match expected {
                        None => {
                            prop_assert_eq!(result, Err(FsmError::NoActiveState));
                        }
                        Some(_) if event == EVENTS - 1 => {
                            prop_assert!(result.is_ok());
                            prop_assert!(log.borrow().is_empty());
                            prop_assert_eq!(machine.history().len(), before);
                        }
                        Some(current) => {
                            prop_assert!(result.is_ok());
                            let next = (current + event) % STATES;
                            prop_assert_eq!(
                                &*log.borrow(),
                                &vec![(current, "exit"), (next, "enter")]
                            );
                            expected = Some(next);
                        }
                    }
                }
                Op::Update => {
                    let result = machine.update();
                    match expected {
                        None => {
                            prop_assert_eq!(result, Err(FsmError::NoActiveState));
                        }
                        Some(current) => {
                            prop_assert!(result.is_ok());
                            prop_assert_eq!(&*log.borrow(), &vec![(current, "update")]);
                        }
                    }
                }
            }

            prop_assert_eq!(machine.current_state_id(), expected.as_ref());
        }
    }

    #[test]
    fn history_path_matches_entered_states(targets in prop::collection::vec(0..STATES, 1..20)) {
        let log = Log::default();
        let mut machine = machine(&log);

        for id in &targets {
            machine.set(*id).unwrap();
        }

        let path: Vec<u8> = machine.history().get_path().into_iter().copied().collect();
        prop_assert_eq!(path, targets);
    }

    #[test]
    fn queued_requests_apply_all_or_nothing(
        start in 0..STATES,
        script in prop::collection::vec(arbitrary_op(), 0..8),
    ) {
        let script: Vec<Op> = script.into_iter().filter(|op| !matches!(op, Op::Update)).collect();
        let mut machine = scripted_machine(&script);
        machine.set(start).unwrap();
        let before = machine.history().len();

        let mut current = start;
        let mut taken = 0;
        let mut failure = None;
        for op in &script {
            match *op {
                Op::Set(id) if id >= STATES => {
                    failure = Some(id);
                    break;
                }
                Op::Set(id) => {
                    current = id;
                    taken += 1;
                }
                Op::Send(event) if event < EVENTS - 1 => {
                    current = (current + event) % STATES;
                    taken += 1;
                }
                _ => {}
            }
        }

        let result = machine.update();

        match failure {
            Some(id) => {
                prop_assert_eq!(result, Err(FsmError::UnknownStateId(id)));
                prop_assert_eq!(machine.current_state_id(), Some(&start));
                prop_assert_eq!(machine.history().len(), before);
            }
            None => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(machine.current_state_id(), Some(&current));
                prop_assert_eq!(machine.history().len(), before + taken);
            }
        }
    }

    #[test]
    fn registration_never_changes_current_state(extra in STATES..50u8) {
        let log = Log::default();
        let mut machine = machine(&log);
        machine.set(0).unwrap();

        let state = Tracked { id: extra, log: Rc::clone(&log), base: StateBase::new() };
        machine.register(extra, state).unwrap();

        prop_assert_eq!(machine.current_state_id(), Some(&0));
    }
}
