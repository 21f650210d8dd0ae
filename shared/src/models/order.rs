//! Order Model

use crate::types::{StorageType, Temperature};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A food order as delivered by the challenge server.
///
/// Immutable once created; the engine never changes an order, only its
/// residency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Ideal temperature class
    #[serde(rename = "temp")]
    pub temperature: Temperature,
    /// Price in currency unit (informational only)
    pub price: Decimal,
    /// Freshness budget in whole seconds (strictly positive)
    #[serde(rename = "freshness")]
    pub freshness_seconds: u32,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        temperature: Temperature,
        price: Decimal,
        freshness_seconds: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            temperature,
            price,
            freshness_seconds,
        }
    }

    /// The storage area this order is ideally kept in.
    pub fn ideal_storage(&self) -> StorageType {
        self.temperature.ideal_storage()
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order{{id={}, name={}, temp={}, price={}, freshness={}s}}",
            self.id, self.name, self.temperature, self.price, self.freshness_seconds
        )
    }
}
