//! Unified error types for challenge-client.
//!
//! A single `ClientError` covers configuration, transport, protocol, and
//! test-case file failures.

use thiserror::Error;

/// Unified error type for all client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    // ===== Transport Errors =====
    /// Failed to establish connection.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Request failed.
    #[error("Request failed: {0}")]
    Request(String),

    // ===== Protocol Errors =====
    /// Authentication failed on the challenge server.
    #[error("Authentication failed (HTTP 401): check that the auth token is valid")]
    Unauthorized,

    /// The test was already submitted once.
    #[error(
        "Test already submitted (HTTP 409): test IDs can only be submitted once; \
         use --skip-submission when rerunning saved tests"
    )]
    AlreadySubmitted,

    /// Non-success status with a body excerpt.
    #[error("Challenge server error: HTTP {status} - {body}")]
    Protocol { status: u16, body: String },

    /// The `/new` response carried no `x-test-id` header.
    #[error("No test ID received from server")]
    MissingTestId,

    // ===== Data Errors =====
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error on a test-case file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e.to_string())
        } else if e.is_connect() {
            ClientError::Connection(e.to_string())
        } else if e.is_decode() {
            ClientError::Serialization(e.to_string())
        } else {
            ClientError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
