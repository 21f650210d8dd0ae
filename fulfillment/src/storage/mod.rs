//! Bounded storage: residency tracking, freshness, eviction, and the engine

pub mod eviction;
pub mod freshness;
pub mod manager;

pub use eviction::EvictionIndex;
pub use freshness::{AgeResolution, FreshnessPolicy};
pub use manager::{EngineError, EngineResult, StorageManager};

use shared::{Order, StorageType};

/// Where an order currently lives and since when.
///
/// Owned exclusively by the storage engine; the eviction index only holds
/// order-id back references into it.
#[derive(Debug, Clone)]
pub struct Residency {
    pub order: Order,
    pub area: StorageType,
    /// When the order first entered the engine, in microseconds. A move keeps
    /// this timestamp; only the degradation rate changes with the area.
    pub placed_at_micros: i64,
}

impl Residency {
    pub fn new(order: Order, area: StorageType, placed_at_micros: i64) -> Self {
        Self {
            order,
            area,
            placed_at_micros,
        }
    }

    /// Whether the order sits in its ideal temperature area.
    pub fn is_at_ideal(&self) -> bool {
        self.order.temperature.ideal_storage() == self.area
    }
}
