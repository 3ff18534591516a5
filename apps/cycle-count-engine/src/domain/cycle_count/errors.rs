//! Cycle count errors.

use super::value_objects::{CountStrategy, SessionAction, SessionStatus};
use crate::domain::shared::{LineId, LocationId, SessionId};
use crate::domain::stock_ledger::ParseAbcClassError;

/// Errors surfaced by the reconciliation engine.
///
/// Every variant reaches the caller unmodified. Only
/// [`CycleCountError::LedgerTransaction`] and
/// [`CycleCountError::ConcurrentModification`] are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleCountError {
    /// Session, location, line or product absent or owned by another tenant.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type.
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Input rejected before any state changed.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Operation not allowed in the session's current status.
    #[error("Cannot {action} a session in status {status}: {reason}")]
    InvalidOperation {
        /// Attempted operation.
        action: SessionAction,
        /// Current status.
        status: SessionStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Sampling produced no lines; the session stays in draft.
    #[error("No products at location {location_id} match the {strategy} count criteria")]
    NoEligibleItems {
        /// Location being counted.
        location_id: LocationId,
        /// Sampling strategy used.
        strategy: CountStrategy,
    },

    /// Completion attempted while lines are still uncounted.
    #[error("{} item(s) have not been counted yet", pending_lines.len())]
    IncompleteCount {
        /// Lines still missing a count.
        pending_lines: Vec<LineId>,
    },

    /// Transition outside the lifecycle graph.
    #[error("Illegal session state transition: {from} -> {to}")]
    IllegalStateTransition {
        /// Current status.
        from: SessionStatus,
        /// Attempted status.
        to: SessionStatus,
    },

    /// Ledger transaction failed; nothing was applied.
    #[error("Adjustment not applied, safe to retry: {message}")]
    LedgerTransaction {
        /// Underlying ledger failure.
        message: String,
    },

    /// Another writer updated the session first and retries ran out.
    #[error("Session {session_id} was modified concurrently")]
    ConcurrentModification {
        /// Contended session.
        session_id: SessionId,
    },

    /// Repository or collaborator infrastructure failure.
    #[error("Storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },
}

impl CycleCountError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a `Validation` error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if re-invoking the same operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LedgerTransaction { .. } | Self::ConcurrentModification { .. }
        )
    }
}

impl From<ParseAbcClassError> for CycleCountError {
    fn from(err: ParseAbcClassError) -> Self {
        Self::validation("abc_filter", err.to_string())
    }
}
