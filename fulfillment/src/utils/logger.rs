//! Logging Infrastructure
//!
//! Structured console logging for the harness. `RUST_LOG` wins when set;
//! otherwise the passed level is used. JSON output is available for machine
//! capture of run logs.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// # Arguments
/// * `level` - Default log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to emit JSON instead of human-readable lines
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;
    }

    Ok(())
}
