//! Shared types for the kitchen fulfillment system
//!
//! Domain types used across the engine and the challenge-server client:
//! temperature classes, storage areas, ledger actions, and the order model.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use models::{Action, Order};
pub use rust_decimal::Decimal;
pub use types::{ActionType, StorageType, Temperature};
