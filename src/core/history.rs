//! State transition history tracking.
//!
//! Every successful `set` on a machine leaves a record here, whether it was
//! requested directly, triggered by an event, or queued from `on_update`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use fsm_lite::StateTransition;
/// use chrono::Utc;
///
/// let transition: StateTransition<&str, &str> = StateTransition {
///     from: Some("idle"),
///     to: "running",
///     event: Some("start"),
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_initial());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S, E> {
    /// The state being left; `None` for the first `set` on a machine
    pub from: Option<S>,
    /// The state being entered
    pub to: S,
    /// The event that fired the transition; `None` for a direct `set`
    pub event: Option<E>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl<S, E> StateTransition<S, E> {
    /// Whether this is the initialization transition (no prior state).
    pub fn is_initial(&self) -> bool {
        self.from.is_none()
    }
}

/// Ordered history of state transitions.
///
/// `record` returns a new history with the transition added and leaves the
/// original alone; `push` appends in place. A history may be bounded with
/// [`StateHistory::with_limit`], in which case the oldest transitions are
/// evicted first.
///
/// # Example
///
/// ```rust
/// use fsm_lite::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history: StateHistory<&str, &str> = StateHistory::new();
///
/// let history = history.record(StateTransition {
///     from: None,
///     to: "idle",
///     event: None,
///     timestamp: Utc::now(),
/// });
/// let history = history.record(StateTransition {
///     from: Some("idle"),
///     to: "running",
///     event: Some("start"),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&"idle", &"running"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<S, E> {
    transitions: VecDeque<StateTransition<S, E>>,
    #[serde(skip)]
    limit: Option<usize>,
}

impl<S, E> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PartialEq, E: PartialEq> PartialEq for StateHistory<S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.transitions == other.transitions
    }
}

impl<S, E> StateHistory<S, E> {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history that keeps only the `limit` most recent transitions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fsm_lite::{StateHistory, StateTransition};
    /// use chrono::Utc;
    ///
    /// let mut history: StateHistory<u8, ()> = StateHistory::with_limit(2);
    /// for to in 0..5 {
    ///     history.push(StateTransition { from: None, to, event: None, timestamp: Utc::now() });
    /// }
    /// assert_eq!(history.get_path(), vec![&3, &4]);
    /// ```
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// The retention limit, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Change the retention limit, dropping the oldest transitions that no
    /// longer fit.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.trim();
    }

    /// Append a transition in place, evicting the oldest one when the
    /// history is at its limit.
    pub fn push(&mut self, transition: StateTransition<S, E>) {
        self.transitions.push_back(transition);
        self.trim();
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched. Use [`StateHistory::push`]
    /// when the old history is not needed; it does not copy.
    pub fn record(&self, transition: StateTransition<S, E>) -> Self
    where
        S: Clone,
        E: Clone,
    {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` state of the first transition when there is one,
    /// then lists the `to` state of each transition in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(from) = self.transitions.front().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time elapsed between the first and last recorded transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Recorded transitions, oldest first.
    pub fn transitions(
        &self,
    ) -> impl DoubleEndedIterator<Item = &StateTransition<S, E>> + ExactSizeIterator {
        self.transitions.iter()
    }

    /// The transition at `index`, counting from the oldest retained one.
    pub fn get(&self, index: usize) -> Option<&StateTransition<S, E>> {
        self.transitions.get(index)
    }

    /// The most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S, E>> {
        self.transitions.back()
    }

    /// Number of retained transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether nothing has been recorded or retained.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }
}
