//! Sampling strategy of a count session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the lines of a session are chosen from the location's stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountStrategy {
    /// Every product stocked at the location.
    #[default]
    Full,
    /// Only products of one ABC class.
    AbcBased,
    /// A random share of the location's products.
    RandomSample,
    /// A product list chosen by the caller.
    SpotCheck,
}

impl CountStrategy {
    /// Returns true if the strategy needs an ABC filter.
    #[must_use]
    pub const fn requires_abc_filter(&self) -> bool {
        matches!(self, Self::AbcBased)
    }

    /// Returns true if the strategy needs a caller-supplied product list.
    #[must_use]
    pub const fn requires_product_list(&self) -> bool {
        matches!(self, Self::SpotCheck)
    }
}

impl fmt::Display for CountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "FULL"),
            Self::AbcBased => write!(f, "ABC_BASED"),
            Self::RandomSample => write!(f, "RANDOM_SAMPLE"),
            Self::SpotCheck => write!(f, "SPOT_CHECK"),
        }
    }
}
