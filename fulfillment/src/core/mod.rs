//! Configuration and top-level errors

pub mod config;
pub mod error;

pub use config::{ConfigError, RunConfig, RunOptions};
pub use error::{AppError, AppResult};
