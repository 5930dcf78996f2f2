//! Checkpoint and resume for machines.
//!
//! A checkpoint captures where a machine is (current state, transition
//! tables, history) but not what its states do: hook bodies are code and are
//! never serialized. To resume, register the same states on a fresh machine
//! and hand it the checkpoint.

use crate::core::{EventId, MachineId, StateHistory, StateId};
use crate::machine::Machine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Outgoing transitions of one registered state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateEntry<S, E> {
    pub id: S,
    pub transitions: Vec<(E, S)>,
}

/// Serializable snapshot of a machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint<S, E> {
    /// Checkpoint format version
    pub version: u32,

    /// Machine the checkpoint was taken from
    pub machine: MachineId,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current state, `None` if the machine was never set
    pub current_state: Option<S>,

    /// Every registered state with its transitions
    pub states: Vec<StateEntry<S, E>>,

    /// Complete transition history
    pub history: StateHistory<S, E>,
}

impl<S, E> Checkpoint<S, E> {
    /// Reject checkpoints written in a format this build cannot read.
    pub fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<S: Serialize, E: Serialize> Checkpoint<S, E> {
    /// Compact JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Bincode encoding, smaller than JSON but not human readable.
    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }
}

impl<S: DeserializeOwned, E: DeserializeOwned> Checkpoint<S, E> {
    /// Parse a checkpoint, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Decode a binary checkpoint, rejecting unsupported versions.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }
}

impl<S: StateId, E: EventId> Machine<S, E> {
    /// Capture the machine's current position.
    pub fn checkpoint(&self) -> Checkpoint<S, E> {
        let states = self
            .state_ids()
            .filter_map(|id| {
                self.state(id).map(|state| StateEntry {
                    id: id.clone(),
                    transitions: state
                        .base()
                        .transitions()
                        .map(|(event, to)| (event.clone(), to.clone()))
                        .collect(),
                })
            })
            .collect();

        Checkpoint {
            version: CHECKPOINT_VERSION,
            machine: self.id(),
            timestamp: Utc::now(),
            current_state: self.current_state_id().cloned(),
            states,
            history: self.history().clone(),
        }
    }

    /// Restore current state and history from `checkpoint`.
    ///
    /// Every state named by the checkpoint, including those in its history,
    /// must already be registered. The checkpoint's current state is entered
    /// with the same exit/enter sequence as `set`: a machine that is already
    /// running exits its current state first. The restore itself is not added
    /// to history; the checkpoint's history replaces the machine's.
    pub fn resume(&mut self, checkpoint: &Checkpoint<S, E>) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;

        let missing = checkpoint
            .states
            .iter()
            .map(|entry| &entry.id)
            .chain(checkpoint.current_state.iter())
            .chain(
                checkpoint
                    .history
                    .transitions()
                    .flat_map(|t| t.from.iter().chain(std::iter::once(&t.to))),
            )
            .find(|id| !self.contains(id));
        if let Some(id) = missing {
            return Err(CheckpointError::ValidationFailed(format!(
                "State id {:?} is not registered on machine {}",
                id,
                self.id()
            )));
        }

        self.restore(checkpoint.current_state.clone(), checkpoint.history.clone())
            .map_err(|e| CheckpointError::Machine(e.to_string()))?;

        debug!(
            machine = %self.id(),
            source = %checkpoint.machine,
            state = ?checkpoint.current_state,
            "Resumed from checkpoint"
        );
        Ok(())
    }
}
