//! Challenge server client
//!
//! Thin HTTP adapter for the kitchen challenge server:
//! - fetch a new problem (`GET /new`) and submit a solution (`POST /solve`)
//! - save / load / annotate test-case JSON files for offline replay

mod client;
mod config;
pub mod error;
mod testdata;
mod types;

pub use client::ChallengeClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use testdata::TestData;
pub use types::{ChallengeOptions, ChallengeRequest, ProblemResult};
