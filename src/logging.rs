//! Structured logging built on the `tracing` crate.

use crate::error::ConfigError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable that overrides the configured filter directive.
const ENV_FILTER_VAR: &str = "ARBOR_LOG";

/// Initialize the global subscriber.
///
/// `level` is the default filter directive (e.g. "info" or
/// "arbor=debug"); the `ARBOR_LOG` environment variable takes
/// precedence when set. Logs go to stderr so blob output on stdout
/// stays clean.
pub fn init(level: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_env(ENV_FILTER_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| ConfigError::Invalid(format!("invalid log filter {:?}: {}", level, e)))?;

    Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|e| ConfigError::Invalid(format!("failed to initialize logging: {}", e)))?;

    Ok(())
}
