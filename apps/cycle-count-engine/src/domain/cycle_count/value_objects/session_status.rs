//! Count session status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a count session.
///
/// ```text
/// DRAFT -> IN_PROGRESS -> COMPLETED -> VERIFIED
///   \__________\__> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Created, no lines yet.
    Draft,
    /// Lines sampled, counting underway.
    InProgress,
    /// Every line counted, variances computed.
    Completed,
    /// Variances signed off; adjustment may be applied.
    Verified,
    /// Abandoned before completion.
    Cancelled,
}

impl SessionStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::InProgress,
        Self::Completed,
        Self::Verified,
        Self::Cancelled,
    ];

    /// Returns true once the session can no longer leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Cancelled)
    }

    /// Returns true while lines exist whose counts may still reach the ledger.
    #[must_use]
    pub const fn has_open_lines(&self) -> bool {
        matches!(self, Self::InProgress | Self::Completed | Self::Verified)
    }

    /// Returns true if the session may still be cancelled.
    #[must_use]
    pub const fn is_cancelable(&self) -> bool {
        matches!(self, Self::Draft | Self::InProgress)
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Verified => "VERIFIED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown session status '{s}'"))
    }
}
