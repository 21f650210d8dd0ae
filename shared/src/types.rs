//! Kitchen domain enums
//!
//! Closed sets for temperature classes, storage areas, and ledger actions.
//! All three serialize to the lowercase strings the challenge server expects.

use serde::{Deserialize, Serialize};

/// Temperature class of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Hot,
    Cold,
    Room,
}

impl Temperature {
    /// The storage area this temperature class is ideally kept in.
    pub fn ideal_storage(&self) -> StorageType {
        match self {
            Temperature::Hot => StorageType::Heater,
            Temperature::Cold => StorageType::Cooler,
            Temperature::Room => StorageType::Shelf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Temperature::Hot => "hot",
            Temperature::Cold => "cold",
            Temperature::Room => "room",
        }
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three bounded storage areas in the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Heater,
    Cooler,
    Shelf,
}

impl StorageType {
    /// All areas, in the order they are reported in status logs.
    pub const ALL: [StorageType; 3] =
        [StorageType::Heater, StorageType::Cooler, StorageType::Shelf];

    /// Fixed capacity of the area.
    pub fn capacity(&self) -> usize {
        match self {
            StorageType::Heater => 6,
            StorageType::Cooler => 6,
            StorageType::Shelf => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Heater => "heater",
            StorageType::Cooler => "cooler",
            StorageType::Shelf => "shelf",
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of ledger action taken on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Place,
    Move,
    Pickup,
    Discard,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Place => "place",
            ActionType::Move => "move",
            ActionType::Pickup => "pickup",
            ActionType::Discard => "discard",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_storage_mapping() {
        assert_eq!(Temperature::Hot.ideal_storage(), StorageType::Heater);
        assert_eq!(Temperature::Cold.ideal_storage(), StorageType::Cooler);
        assert_eq!(Temperature::Room.ideal_storage(), StorageType::Shelf);
    }

    #[test]
    fn test_capacities() {
        assert_eq!(StorageType::Heater.capacity(), 6);
        assert_eq!(StorageType::Cooler.capacity(), 6);
        assert_eq!(StorageType::Shelf.capacity(), 12);
    }

    #[test]
    fn test_wire_serialization_is_lowercase() {
        assert_eq!(serde_json::to_string(&Temperature::Hot).unwrap(), "\"hot\"");
        assert_eq!(
            serde_json::to_string(&StorageType::Cooler).unwrap(),
            "\"cooler\""
        );
        assert_eq!(
            serde_json::to_string(&ActionType::Discard).unwrap(),
            "\"discard\""
        );

        let temp: Temperature = serde_json::from_str("\"room\"").unwrap();
        assert_eq!(temp, Temperature::Room);
        let area: StorageType = serde_json::from_str("\"shelf\"").unwrap();
        assert_eq!(area, StorageType::Shelf);
    }
}
