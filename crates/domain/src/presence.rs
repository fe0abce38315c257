//! Presence events — a tracked device joining or leaving the network.

use serde::{Deserialize, Serialize};

use crate::device::DeviceKey;
use crate::time::{Timestamp, now};

/// Direction of a presence change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceChange {
    Appeared,
    Disappeared,
}

impl std::fmt::Display for PresenceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Appeared => f.write_str("appeared"),
            Self::Disappeared => f.write_str("disappeared"),
        }
    }
}

/// An immutable notification that `identity` joined or left the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub identity: DeviceKey,
    pub change: PresenceChange,
    pub observed_at: Timestamp,
}

impl PresenceEvent {
    /// Create an event observed now.
    #[must_use]
    pub fn new(identity: DeviceKey, change: PresenceChange) -> Self {
        Self {
            identity,
            change,
            observed_at: now(),
        }
    }

    #[must_use]
    pub fn appeared(identity: DeviceKey) -> Self {
        Self::new(identity, PresenceChange::Appeared)
    }

    #[must_use]
    pub fn disappeared(identity: DeviceKey) -> Self {
        Self::new(identity, PresenceChange::Disappeared)
    }
}
