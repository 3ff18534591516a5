//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

use crate::domain::cycle_count::LocationOverlapPolicy;

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Prefix of generated session codes.
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,
    /// Whether two open sessions may share a location.
    #[serde(default)]
    pub location_overlap: LocationOverlapPolicy,
    /// Reload-and-retry attempts after a version conflict.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            code_prefix: default_code_prefix(),
            location_overlap: LocationOverlapPolicy::default(),
            max_conflict_retries: default_max_conflict_retries(),
        }
    }
}

fn default_code_prefix() -> String {
    "CC".to_string()
}

const fn default_max_conflict_retries() -> u32 {
    5
}
