//! Operations that drive the session state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation requested on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// Sample lines and begin counting.
    Start,
    /// Record physical counts.
    RecordCounts,
    /// Close counting and compute variances.
    Complete,
    /// Sign off the variances.
    Verify,
    /// Apply variances to the stock ledger.
    Adjust,
    /// Abandon the session.
    Cancel,
}

impl SessionAction {
    /// All actions.
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::RecordCounts,
        Self::Complete,
        Self::Verify,
        Self::Adjust,
        Self::Cancel,
    ];
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::RecordCounts => write!(f, "record counts on"),
            Self::Complete => write!(f, "complete"),
            Self::Verify => write!(f, "verify"),
            Self::Adjust => write!(f, "adjust"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}
