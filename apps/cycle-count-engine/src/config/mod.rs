//! Configuration module for the cycle count engine.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before any component is built from it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cycle_count_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! println!("code prefix: {}", config.sessions.code_prefix);
//! ```

mod listing;
mod observability;
mod sampling;
mod sessions;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use listing::ListingConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use sampling::SamplingConfig;
pub use sessions::SessionsConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sampling configuration.
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Listing configuration.
    #[serde(default)]
    pub listing: ListingConfig,
    /// Session lifecycle configuration.
    #[serde(default)]
    pub sessions: SessionsConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. An unset or empty
/// variable without a default becomes the empty string.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let ratio = config.sampling.random_sample_ratio;
    if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "sampling.random_sample_ratio must be in (0, 1]".to_string(),
        ));
    }

    if config.sampling.min_sample_size == 0 {
        return Err(ConfigError::ValidationError(
            "sampling.min_sample_size must be at least 1".to_string(),
        ));
    }

    let listing = &config.listing;
    if listing.max_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "listing.max_page_size must be at least 1".to_string(),
        ));
    }
    if listing.default_page_size == 0 || listing.default_page_size > listing.max_page_size {
        return Err(ConfigError::ValidationError(format!(
            "listing.default_page_size must be between 1 and {}",
            listing.max_page_size
        )));
    }

    let prefix = &config.sessions.code_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::ValidationError(
            "sessions.code_prefix must be non-empty and alphanumeric".to_string(),
        ));
    }

    let level = config.observability.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level must be one of: {LOG_LEVELS:?}"
        )));
    }

    Ok(())
}
