//! Domain events for count sessions.
//!
//! One event per successful transition, drained by the use case after the
//! session is persisted and handed to the event publisher.

use serde::{Deserialize, Serialize};

use super::value_objects::{CountStrategy, SessionStatus};
use crate::domain::shared::{LocationId, Money, SessionId, TenantId, Timestamp, UserId};

/// All possible session events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountSessionEvent {
    /// Session created in draft.
    Created(SessionCreated),
    /// Lines sampled and counting started.
    Started(SessionStarted),
    /// Counts recorded on some lines.
    CountsRecorded(CountsRecorded),
    /// Counting closed and variances computed.
    Completed(SessionCompleted),
    /// Variances signed off.
    Verified(SessionVerified),
    /// Variances applied to the ledger.
    Adjusted(SessionAdjusted),
    /// Session abandoned.
    Cancelled(SessionCancelled),
}

impl CountSessionEvent {
    /// Get the session this event belongs to.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        match self {
            Self::Created(e) => &e.session_id,
            Self::Started(e) => &e.session_id,
            Self::CountsRecorded(e) => &e.session_id,
            Self::Completed(e) => &e.session_id,
            Self::Verified(e) => &e.session_id,
            Self::Adjusted(e) => &e.session_id,
            Self::Cancelled(e) => &e.session_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::Created(e) => e.occurred_at,
            Self::Started(e) => e.occurred_at,
            Self::CountsRecorded(e) => e.occurred_at,
            Self::Completed(e) => e.occurred_at,
            Self::Verified(e) => e.occurred_at,
            Self::Adjusted(e) => e.occurred_at,
            Self::Cancelled(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "COUNT_SESSION_CREATED",
            Self::Started(_) => "COUNT_SESSION_STARTED",
            Self::CountsRecorded(_) => "COUNT_SESSION_COUNTS_RECORDED",
            Self::Completed(_) => "COUNT_SESSION_COMPLETED",
            Self::Verified(_) => "COUNT_SESSION_VERIFIED",
            Self::Adjusted(_) => "COUNT_SESSION_ADJUSTED",
            Self::Cancelled(_) => "COUNT_SESSION_CANCELLED",
        }
    }
}

/// Event: session created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreated {
    /// Session ID.
    pub session_id: SessionId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Human-readable code.
    pub code: String,
    /// Location to count.
    pub location_id: LocationId,
    /// Sampling strategy.
    pub strategy: CountStrategy,
    /// Creator.
    pub created_by: UserId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: counting started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// Session ID.
    pub session_id: SessionId,
    /// Lines sampled.
    pub total_items: usize,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: counts recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsRecorded {
    /// Session ID.
    pub session_id: SessionId,
    /// Lines touched by this call.
    pub lines_recorded: usize,
    /// Lines counted so far.
    pub counted_items: usize,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: counting completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// Session ID.
    pub session_id: SessionId,
    /// Lines with non-zero variance.
    pub variance_count: usize,
    /// Sum of absolute variance values.
    pub variance_value: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: variances verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVerified {
    /// Session ID.
    pub session_id: SessionId,
    /// Verifier.
    pub verified_by: UserId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: variances applied to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAdjusted {
    /// Session ID.
    pub session_id: SessionId,
    /// Lines marked adjusted by this call.
    pub lines_adjusted: usize,
    /// Net quantity change applied.
    pub net_delta: i64,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: session cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCancelled {
    /// Session ID.
    pub session_id: SessionId,
    /// Status the session was cancelled from.
    pub previous_status: SessionStatus,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_accessors() {
        let now = Timestamp::now();
        let event = CountSessionEvent::Cancelled(SessionCancelled {
            session_id: SessionId::new("s-1"),
            previous_status: SessionStatus::InProgress,
            occurred_at: now,
        });
        assert_eq!(event.session_id().as_str(), "s-1");
        assert_eq!(event.occurred_at(), now);
        assert_eq!(event.event_type(), "COUNT_SESSION_CANCELLED");
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = CountSessionEvent::Started(SessionStarted {
            session_id: SessionId::new("s-1"),
            total_items: 4,
            occurred_at: Timestamp::parse("2026-01-19T12:00:00Z").unwrap(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "STARTED");
        assert_eq!(json["total_items"], 4);
    }
}
