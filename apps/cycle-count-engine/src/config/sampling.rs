//! Sampling configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::cycle_count::SamplingPolicy;

/// Random sample tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Share of a location drawn by RANDOM_SAMPLE, in `(0, 1]`.
    #[serde(default = "default_random_sample_ratio")]
    pub random_sample_ratio: Decimal,
    /// Smallest random sample from a non-empty location.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            random_sample_ratio: default_random_sample_ratio(),
            min_sample_size: default_min_sample_size(),
        }
    }
}

impl SamplingConfig {
    /// Domain policy built from this section.
    #[must_use]
    pub const fn policy(&self) -> SamplingPolicy {
        SamplingPolicy {
            random_sample_ratio: self.random_sample_ratio,
            min_sample_size: self.min_sample_size,
        }
    }
}

fn default_random_sample_ratio() -> Decimal {
    dec!(0.2)
}

const fn default_min_sample_size() -> usize {
    1
}
