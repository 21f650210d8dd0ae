//! Wire types for the challenge server

use serde::{Deserialize, Serialize};
use shared::{Action, Order};

/// A fetched problem: the test identifier plus the orders to fulfill.
#[derive(Debug, Clone)]
pub struct ProblemResult {
    /// Test identifier from the `x-test-id` response header
    pub test_id: String,
    /// Orders, in placement order
    pub orders: Vec<Order>,
}

/// Timing options echoed back to the server with a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOptions {
    /// Placement rate in microseconds
    pub rate: i64,
    /// Minimum pickup delay in microseconds
    pub min: i64,
    /// Maximum pickup delay in microseconds
    pub max: i64,
}

/// Body of `POST /solve`.
///
/// `Action` already serializes to the exact wire shape
/// (`timestamp`/`id`/`action`/`target`), so the ledger is embedded as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeRequest {
    pub options: ChallengeOptions,
    pub actions: Vec<Action>,
}
