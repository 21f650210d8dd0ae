//! Kitchen fulfillment engine
//!
//! Fulfills food orders against the challenge server: orders arrive on a
//! timed cadence, live in one of three bounded storage areas, and leave by
//! pickup or discard. Every action is recorded in a timestamp-ordered ledger
//! for grading.
//!
//! # Module structure
//!
//! ```text
//! fulfillment/src/
//! ├── core/          # CLI configuration, top-level errors
//! ├── storage/       # Freshness model, eviction index, storage engine
//! ├── service/       # Placement timeline, scheduled pickups, ledger
//! └── utils/         # Logging
//! ```

pub mod core;
pub mod service;
pub mod storage;
pub mod utils;

// Re-export public types
pub use crate::core::{AppError, AppResult, ConfigError, RunConfig, RunOptions};
pub use crate::service::KitchenService;
pub use crate::storage::{
    AgeResolution, EngineError, EngineResult, FreshnessPolicy, StorageManager,
};
pub use crate::utils::init_logger;
