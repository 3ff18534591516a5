//! Policy for sessions sharing a location.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether several sessions may count the same location at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationOverlapPolicy {
    /// Any number of sessions per location.
    #[default]
    Allow,
    /// A session cannot start while another one still holds the location.
    Exclusive,
}

impl fmt::Display for LocationOverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}
