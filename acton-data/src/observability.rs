//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{Error, Result};

/// Installs the global tracing subscriber described by `config.logging`
///
/// Falls back to the `info` level when the configured filter does not parse.
///
/// # Errors
///
/// Returns [`Error::Internal`] if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = &config.logging.log_level;
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    installed.map_err(|e| Error::Internal(format!("Failed to initialize tracing: {e}")))?;

    tracing::info!(log_level = %log_level, json = config.logging.json, "Tracing initialized");
    Ok(())
}
