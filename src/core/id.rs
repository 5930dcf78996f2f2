//! Identifier contract for states, events and machines.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// Identifier naming a state within one machine.
///
/// Implemented for every type that is cloneable, hashable and comparable,
/// so small enums, integers and strings all work out of the box.
///
/// # Example
///
/// ```rust
/// use fsm_lite::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// fn assert_state_id<T: StateId>() {}
/// assert_state_id::<Door>();
/// assert_state_id::<u32>();
/// assert_state_id::<&'static str>();
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + 'static {}

impl<T> StateId for T where T: Clone + Eq + Hash + Debug + 'static {}

/// Identifier naming a stimulus sent to a machine.
///
/// The same event may trigger different transitions in different states.
pub trait EventId: Clone + Eq + Hash + Debug + 'static {}

impl<T> EventId for T where T: Clone + Eq + Hash + Debug + 'static {}

/// Handle naming one machine instance.
///
/// States are bound to the handle of the machine they are registered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(Uuid);

impl MachineId {
    /// Mint a fresh, random machine id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
