//! Ledger action model

use crate::types::{ActionType, StorageType};
use serde::{Deserialize, Serialize};

/// A single entry in the fulfillment ledger.
///
/// Serializes to exactly the shape the challenge server grades:
/// `{ "timestamp": <µs>, "id": "...", "action": "place", "target": "shelf" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Timestamp in microseconds
    pub timestamp: i64,
    /// Order identifier
    pub id: String,
    /// What was done
    pub action: ActionType,
    /// The storage area the action applies to
    pub target: StorageType,
}

impl Action {
    pub fn new(
        timestamp: i64,
        id: impl Into<String>,
        action: ActionType,
        target: StorageType,
    ) -> Self {
        Self {
            timestamp,
            id: id.into(),
            action,
            target,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} -> {}",
            self.timestamp, self.action, self.id, self.target
        )
    }
}
