//! Tracing Setup
//!
//! Initializes console logging from the `observability.logging` section.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured level when set
//!
//! # Usage
//!
//! ```rust,ignore
//! use cycle_count_engine::config::load_config;
//! use cycle_count_engine::telemetry::init_telemetry;
//!
//! let config = load_config(None)?;
//! init_telemetry(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` first, the configured level otherwise.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global console subscriber.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.include_target)
        .with_ansi(config.ansi)
        .finish()
        .try_init()?;

    tracing::info!(level = %config.level, "Logging initialized");
    Ok(())
}
