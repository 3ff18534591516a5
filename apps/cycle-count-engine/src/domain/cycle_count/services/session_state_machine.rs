//! Session State Machine Service
//!
//! Single source of truth for which operations are legal in which status.

use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::value_objects::{SessionAction, SessionStatus};

/// Session state machine for validating operations and transitions.
pub struct SessionStateMachine;

impl SessionStateMachine {
    /// Status an action leads to, or `None` if the action is illegal in `from`.
    ///
    /// The final arm spells out every status and action, so adding a variant
    /// to either enum fails to compile until this table is revisited.
    #[must_use]
    pub const fn target(from: SessionStatus, action: SessionAction) -> Option<SessionStatus> {
        use crate::domain::cycle_count::value_objects::{SessionAction as A, SessionStatus as S};

        match (from, action) {
            (S::Draft, A::Start) => Some(S::InProgress),
            (S::InProgress, A::RecordCounts) => Some(S::InProgress),
            (S::InProgress, A::Complete) => Some(S::Completed),
            (S::Completed, A::Verify) => Some(S::Verified),
            (S::Verified, A::Adjust) => Some(S::Verified),
            (S::Draft | S::InProgress, A::Cancel) => Some(S::Cancelled),
            (
                S::Draft | S::InProgress | S::Completed | S::Verified | S::Cancelled,
                A::Start | A::RecordCounts | A::Complete | A::Verify | A::Adjust | A::Cancel,
            ) => None,
        }
    }

    /// Check if a status change is reachable by some legal action.
    #[must_use]
    pub fn is_valid_transition(from: SessionStatus, to: SessionStatus) -> bool {
        SessionAction::ALL
            .into_iter()
            .any(|action| Self::target(from, action) == Some(to))
    }

    /// Validate that `action` is allowed in `from`, returning the target status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the action is not allowed.
    pub fn validate_action(
        from: SessionStatus,
        action: SessionAction,
    ) -> Result<SessionStatus, CycleCountError> {
        Self::target(from, action).ok_or_else(|| CycleCountError::InvalidOperation {
            action,
            status: from,
            reason: Self::rejection_reason(from, action),
        })
    }

    /// Validate a raw status change.
    ///
    /// # Errors
    ///
    /// Returns `IllegalStateTransition` if no legal action produces it.
    pub fn validate_transition(
        from: SessionStatus,
        to: SessionStatus,
    ) -> Result<(), CycleCountError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(CycleCountError::IllegalStateTransition { from, to })
        }
    }

    /// Human-readable reason an action is rejected.
    #[must_use]
    pub fn rejection_reason(from: SessionStatus, action: SessionAction) -> String {
        match (action, from) {
            (SessionAction::Cancel, SessionStatus::Completed | SessionStatus::Verified) => {
                "completed or verified counts cannot be cancelled".to_string()
            }
            (_, SessionStatus::Cancelled) => "session has been cancelled".to_string(),
            (SessionAction::Start, _) => "only draft counts can be started".to_string(),
            (SessionAction::RecordCounts, _) => {
                "counts can only be recorded on in-progress counts".to_string()
            }
            (SessionAction::Complete, _) => {
                "only in-progress counts can be completed".to_string()
            }
            (SessionAction::Verify, _) => "only completed counts can be verified".to_string(),
            (SessionAction::Adjust, _) => "only verified counts can be adjusted".to_string(),
            (SessionAction::Cancel, _) => format!("cannot cancel from {from}"),
        }
    }

    /// All actions allowed in a status.
    #[must_use]
    pub fn allowed_actions(from: SessionStatus) -> Vec<SessionAction> {
        SessionAction::ALL
            .into_iter()
            .filter(|action| Self::target(from, *action).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cycle_count::value_objects::{SessionAction as A, SessionStatus as S};
    use test_case::test_case;

    #[test_case(S::Draft, A::Start, S::InProgress)]
    #[test_case(S::InProgress, A::RecordCounts, S::InProgress)]
    #[test_case(S::InProgress, A::Complete, S::Completed)]
    #[test_case(S::Completed, A::Verify, S::Verified)]
    #[test_case(S::Verified, A::Adjust, S::Verified)]
    #[test_case(S::Draft, A::Cancel, S::Cancelled)]
    #[test_case(S::InProgress, A::Cancel, S::Cancelled)]
    fn legal_actions(from: SessionStatus, action: SessionAction, to: SessionStatus) {
        assert_eq!(SessionStateMachine::validate_action(from, action), Ok(to));
    }

    #[test]
    fn exactly_seven_legal_pairs() {
        let legal = S::ALL
            .into_iter()
            .flat_map(|from| A::ALL.into_iter().map(move |action| (from, action)))
            .filter(|(from, action)| SessionStateMachine::target(*from, *action).is_some())
            .count();
        assert_eq!(legal, 7);
    }

    #[test_case(S::Completed, A::Cancel)]
    #[test_case(S::Verified, A::Cancel)]
    #[test_case(S::Cancelled, A::Cancel)]
    #[test_case(S::InProgress, A::Start)]
    #[test_case(S::Draft, A::Complete)]
    #[test_case(S::Completed, A::RecordCounts)]
    #[test_case(S::InProgress, A::Verify)]
    #[test_case(S::Completed, A::Adjust)]
    #[test_case(S::Cancelled, A::Start)]
    fn illegal_actions_are_invalid_operations(from: SessionStatus, action: SessionAction) {
        let err = SessionStateMachine::validate_action(from, action).unwrap_err();
        assert!(matches!(
            err,
            CycleCountError::InvalidOperation { status, action: a, .. } if status == from && a == action
        ));
    }

    #[test]
    fn cancel_reason_for_completed() {
        let reason = SessionStateMachine::rejection_reason(S::Completed, A::Cancel);
        assert!(reason.contains("cannot be cancelled"));
    }

    #[test]
    fn transitions_never_go_backwards() {
        assert!(!SessionStateMachine::is_valid_transition(S::InProgress, S::Draft));
        assert!(!SessionStateMachine::is_valid_transition(S::Verified, S::Completed));
        assert!(!SessionStateMachine::is_valid_transition(S::Cancelled, S::Draft));
        assert!(SessionStateMachine::is_valid_transition(S::Completed, S::Verified));
    }

    #[test]
    fn validate_transition_names_states() {
        let err = SessionStateMachine::validate_transition(S::Draft, S::Verified).unwrap_err();
        assert_eq!(
            err,
            CycleCountError::IllegalStateTransition {
                from: S::Draft,
                to: S::Verified
            }
        );
    }

    #[test]
    fn cancelled_allows_nothing() {
        assert!(SessionStateMachine::allowed_actions(S::Cancelled).is_empty());
        assert_eq!(
            SessionStateMachine::allowed_actions(S::Verified),
            vec![A::Adjust]
        );
    }
}
