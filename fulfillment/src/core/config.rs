//! Runtime configuration
//!
//! Command line parsing for the fulfillment harness. Two forms are accepted:
//!
//! ```text
//! <auth_token> [rate_ms] [min_pickup_ms] [max_pickup_ms] [seed]
//!              [--save-test <file>] [--skip-submission]
//! --load-test <file> [auth_token] [--skip-submission]
//! ```
//!
//! Millisecond arguments are converted to microseconds internally.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_RATE_MICROS: i64 = 500_000; // 500ms
pub const DEFAULT_MIN_PICKUP_MICROS: i64 = 4_000_000; // 4 seconds
pub const DEFAULT_MAX_PICKUP_MICROS: i64 = 8_000_000; // 8 seconds

/// Errors from command line parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing auth token")]
    MissingToken,

    #[error("Flag {flag} requires a value")]
    MissingValue { flag: &'static str },

    #[error("Invalid value for {arg}: {value}")]
    InvalidNumber { arg: &'static str, value: String },

    #[error("min_pickup_ms ({min_ms}) must not exceed max_pickup_ms ({max_ms})")]
    InvalidPickupWindow { min_ms: i64, max_ms: i64 },
}

/// Timing parameters for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub rate_micros: i64,
    pub min_pickup_micros: i64,
    pub max_pickup_micros: i64,
    pub seed: Option<u64>,
}

/// Parsed command line for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub auth_token: Option<String>,
    pub rate_micros: i64,
    pub min_pickup_micros: i64,
    pub max_pickup_micros: i64,
    pub seed: Option<u64>,
    pub save_test: Option<PathBuf>,
    pub load_test: Option<PathBuf>,
    pub skip_submission: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            rate_micros: DEFAULT_RATE_MICROS,
            min_pickup_micros: DEFAULT_MIN_PICKUP_MICROS,
            max_pickup_micros: DEFAULT_MAX_PICKUP_MICROS,
            seed: None,
            save_test: None,
            load_test: None,
            skip_submission: false,
        }
    }
}

impl RunConfig {
    /// Parse command line arguments (program name already stripped).
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Replay form: the file comes first, then the token.
        if args.first().map(String::as_str) == Some("--load-test") {
            let file = args.get(1).ok_or(ConfigError::MissingValue {
                flag: "--load-test",
            })?;
            config.load_test = Some(PathBuf::from(file));
            config.skip_submission = args.iter().any(|a| a == "--skip-submission");
            config.auth_token = args.get(2).filter(|a| !a.starts_with("--")).cloned();
            // Replaying without submitting is the only tokenless mode.
            if config.auth_token.is_none() && !config.skip_submission {
                return Err(ConfigError::MissingToken);
            }
            return Ok(config);
        }

        // First pass: extract flags.
        let mut positional: Vec<&String> = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--save-test" => {
                    let value = iter.next().ok_or(ConfigError::MissingValue {
                        flag: "--save-test",
                    })?;
                    config.save_test = Some(PathBuf::from(value));
                }
                "--skip-submission" => config.skip_submission = true,
                _ => positional.push(arg),
            }
        }

        // Second pass: positional arguments, milliseconds on the wire.
        config.auth_token = positional.first().map(|s| s.to_string());
        if let Some(rate_ms) = positional.get(1) {
            config.rate_micros = parse_millis("rate_ms", rate_ms)?;
        }
        if let Some(min_ms) = positional.get(2) {
            config.min_pickup_micros = parse_millis("min_pickup_ms", min_ms)?;
        }
        if let Some(max_ms) = positional.get(3) {
            config.max_pickup_micros = parse_millis("max_pickup_ms", max_ms)?;
        }
        if let Some(seed) = positional.get(4) {
            config.seed = Some(seed.parse().map_err(|_| ConfigError::InvalidNumber {
                arg: "seed",
                value: seed.to_string(),
            })?);
        }

        if config.auth_token.is_none() {
            return Err(ConfigError::MissingToken);
        }
        if config.min_pickup_micros > config.max_pickup_micros {
            return Err(ConfigError::InvalidPickupWindow {
                min_ms: config.min_pickup_micros / 1000,
                max_ms: config.max_pickup_micros / 1000,
            });
        }

        Ok(config)
    }

    /// Timing options for this run.
    pub fn options(&self) -> RunOptions {
        RunOptions {
            rate_micros: self.rate_micros,
            min_pickup_micros: self.min_pickup_micros,
            max_pickup_micros: self.max_pickup_micros,
            seed: self.seed,
        }
    }

    pub fn usage() -> &'static str {
        "Usage: fulfillment <auth_token> [rate_ms] [min_pickup_ms] [max_pickup_ms] [seed] \
         [--save-test <file>] [--skip-submission]\n\
         \x20  OR: fulfillment --load-test <file> [auth_token] [--skip-submission]\n\
         \x20 auth_token: Authentication token for the challenge server\n\
         \x20 rate_ms: Order placement rate in milliseconds (default: 500)\n\
         \x20 min_pickup_ms: Minimum pickup time in milliseconds (default: 4000)\n\
         \x20 max_pickup_ms: Maximum pickup time in milliseconds (default: 8000)\n\
         \x20 seed: Optional seed for reproducible test problems\n\
         \x20 --save-test <file>: Save test data to a JSON file\n\
         \x20 --load-test <file>: Load test data from a JSON file\n\
         \x20 --skip-submission: Skip submitting to the server (offline replay)"
    }
}

fn parse_millis(arg: &'static str, value: &str) -> Result<i64, ConfigError> {
    value
        .parse::<i64>()
        .map(|ms| ms * 1000)
        .map_err(|_| ConfigError::InvalidNumber {
            arg,
            value: value.to_string(),
        })
}
