//! Count line status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single count line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineStatus {
    /// Awaiting a physical count.
    Pending,
    /// Counted quantity recorded.
    Counted,
    /// Variance applied to the stock ledger.
    Adjusted,
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Counted => write!(f, "COUNTED"),
            Self::Adjusted => write!(f, "ADJUSTED"),
        }
    }
}
