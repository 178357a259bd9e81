//! Logging setup for the CLI.
//!
//! Built on `tracing-subscriber`; output goes to stderr so token dumps on
//! stdout stay clean.

use std::io;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `level` overrides `RUST_LOG` when given. Without either, only warnings are
/// shown.
pub fn init(level: Option<&str>) -> Result<(), String> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| format!("Invalid log level '{}': {}", level, e))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
