//! ABC value classification of products.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value/importance tier assigned to a product.
///
/// `A` items are the high-value few that get counted most often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    /// High value.
    A,
    /// Medium value.
    B,
    /// Low value.
    C,
}

impl AbcClass {
    /// Single-letter code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized classification letter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized ABC class '{0}', expected A, B or C")]
pub struct ParseAbcClassError(pub String);

impl FromStr for AbcClass {
    type Err = ParseAbcClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            other => Err(ParseAbcClassError(other.to_string())),
        }
    }
}
