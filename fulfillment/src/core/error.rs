//! Top-level error type for the fulfillment harness
//!
//! Recoverable conditions never reach this type; everything here ends the
//! run with a non-zero exit.

use crate::core::config::ConfigError;
use crate::storage::EngineError;
use challenge_client::ClientError;
use thiserror::Error;

/// Anything that can abort a run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad command line arguments.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Challenge server or test-case file failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Engine invariant violation: a defect, not an operational condition.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for harness operations.
pub type AppResult<T> = Result<T, AppError>;
