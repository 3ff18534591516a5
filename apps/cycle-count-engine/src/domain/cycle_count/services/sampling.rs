//! Sampling Engine
//!
//! Chooses which of a location's stock lines go into a count session.

use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::value_objects::CountStrategy;
use crate::domain::stock_ledger::{AbcClass, LocationStockLine};

/// Tunables for the random sample strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPolicy {
    /// Share of the population drawn, in `(0, 1]`.
    pub random_sample_ratio: Decimal,
    /// Smallest sample drawn from a non-empty population.
    pub min_sample_size: usize,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            random_sample_ratio: dec!(0.2),
            min_sample_size: 1,
        }
    }
}

/// Selects count lines from a stock snapshot.
#[derive(Debug, Clone, Default)]
pub struct SamplingEngine {
    policy: SamplingPolicy,
}

impl SamplingEngine {
    /// Create an engine with the given policy.
    #[must_use]
    pub const fn new(policy: SamplingPolicy) -> Self {
        Self { policy }
    }

    /// Get the sampling policy.
    #[must_use]
    pub const fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Select lines using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `AbcBased` is requested without a class.
    pub fn select_lines(
        &self,
        snapshot: Vec<LocationStockLine>,
        strategy: CountStrategy,
        abc_filter: Option<AbcClass>,
    ) -> Result<Vec<LocationStockLine>, CycleCountError> {
        self.select_lines_with_rng(snapshot, strategy, abc_filter, &mut rand::rng())
    }

    /// Select lines drawing randomness from `rng`.
    ///
    /// An empty result is not an error here; the session decides what an
    /// empty selection means.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `AbcBased` is requested without a class.
    pub fn select_lines_with_rng<R: Rng + ?Sized>(
        &self,
        snapshot: Vec<LocationStockLine>,
        strategy: CountStrategy,
        abc_filter: Option<AbcClass>,
        rng: &mut R,
    ) -> Result<Vec<LocationStockLine>, CycleCountError> {
        let selected = match strategy {
            // SPOT_CHECK snapshots arrive already narrowed to the caller's list.
            CountStrategy::Full | CountStrategy::SpotCheck => snapshot,
            CountStrategy::AbcBased => {
                let class = abc_filter.ok_or_else(|| {
                    CycleCountError::validation(
                        "abc_filter",
                        "an ABC class is required for ABC_BASED counts",
                    )
                })?;
                snapshot
                    .into_iter()
                    .filter(|line| line.abc_class == Some(class))
                    .collect()
            }
            CountStrategy::RandomSample => {
                let size = self.sample_size(snapshot.len());
                let mut shuffled = snapshot;
                shuffled.shuffle(rng);
                shuffled.truncate(size);
                shuffled
            }
        };

        tracing::debug!(
            strategy = %strategy,
            selected = selected.len(),
            "Sampled count lines"
        );

        Ok(selected)
    }

    /// Number of lines a random sample draws from `population` lines.
    #[must_use]
    pub fn sample_size(&self, population: usize) -> usize {
        if population == 0 {
            return 0;
        }
        let scaled = (Decimal::from(population) * self.policy.random_sample_ratio).ceil();
        let size = scaled.to_usize().unwrap_or(population);
        size.max(self.policy.min_sample_size).max(1).min(population)
    }
}
