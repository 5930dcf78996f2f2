//! Declarative transition configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One `from --on--> to` edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRow<S, E> {
    pub from: S,
    pub on: E,
    pub to: S,
}

/// A list of transitions to add to a machine's states.
///
/// Serializes as a plain JSON array of `{ "from", "on", "to" }` objects.
///
/// # Example
///
/// ```rust
/// use fsm_lite::TransitionTable;
///
/// let table: TransitionTable<String, String> = TransitionTable::from_json(
///     r#"[
///         { "from": "idle", "on": "start", "to": "running" },
///         { "from": "running", "on": "stop", "to": "idle" }
///     ]"#,
/// )
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.rows()[0].to, "running");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable<S, E> {
    rows: Vec<TransitionRow<S, E>>,
}

impl<S, E> Default for TransitionTable<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E> TransitionTable<S, E> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row, builder style.
    pub fn row(mut self, from: S, on: E, to: S) -> Self {
        self.push(from, on, to);
        self
    }

    /// Append a row in place.
    pub fn push(&mut self, from: S, on: E, to: S) {
        self.rows.push(TransitionRow { from, on, to });
    }

    /// Rows in the order they were added.
    pub fn rows(&self) -> &[TransitionRow<S, E>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: DeserializeOwned, E: DeserializeOwned> TransitionTable<S, E> {
    /// Parse a table from its JSON array form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<S: Serialize, E: Serialize> TransitionTable<S, E> {
    /// Serialize to the same JSON array form `from_json` reads.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<S, E> FromIterator<(S, E, S)> for TransitionTable<S, E> {
    fn from_iter<I: IntoIterator<Item = (S, E, S)>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|(from, on, to)| TransitionRow { from, on, to })
                .collect(),
        }
    }
}
