//! Logging bootstrap
//!
//! Installs a global `tracing` subscriber for embedders that have none.

use crate::config::RecipeBoxConfig;
use crate::error::CoreError;
use tracing_subscriber::EnvFilter;

/// Build the event filter from configured directives
///
/// # Errors
/// - `CoreError::Telemetry` if the directives do not parse
pub fn filter(config: &RecipeBoxConfig) -> Result<EnvFilter, CoreError> {
    EnvFilter::try_new(&config.log_filter).map_err(|e| CoreError::Telemetry(e.to_string()))
}

/// Install the global fmt subscriber
///
/// # Errors
/// - `CoreError::Telemetry` if the filter is invalid or a subscriber is
///   already installed
pub fn init(config: &RecipeBoxConfig) -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_target(false)
        .try_init()
        .map_err(|e| CoreError::Telemetry(e.to_string()))
}
