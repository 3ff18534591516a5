//! Verify Session Use Case

use std::sync::Arc;

use crate::application::ports::EventPublisherPort;
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountSession, CountSessionRepository};
use crate::domain::shared::{SessionId, TenantContext, UserId};

use super::{load_session, publish_events, rejected, save_session};

/// Use case for signing off a completed count.
pub struct VerifySessionUseCase<R, E>
where
    R: CountSessionRepository,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    event_publisher: Arc<E>,
}

impl<R, E> VerifySessionUseCase<R, E>
where
    R: CountSessionRepository,
    E: EventPublisherPort,
{
    /// Create a new `VerifySessionUseCase`.
    pub const fn new(session_repo: Arc<R>, event_publisher: Arc<E>) -> Self {
        Self {
            session_repo,
            event_publisher,
        }
    }

    /// Record the verifier. Variances are not recomputed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist for the tenant.
    /// - `InvalidOperation` if the session is not completed.
    /// - `ConcurrentModification` if another writer saved first.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
        verifier_id: &UserId,
    ) -> Result<CountSession, CycleCountError> {
        let mut session = load_session(self.session_repo.as_ref(), ctx, session_id).await?;
        session
            .verify(verifier_id)
            .map_err(|e| rejected("verify", session_id, e))?;
        save_session(self.session_repo.as_ref(), &mut session).await?;

        tracing::info!(
            session_id = %session.id(),
            code = session.code(),
            tenant_id = %ctx.tenant_id,
            verified_by = %verifier_id,
            "Count session verified"
        );

        publish_events(self.event_publisher.as_ref(), &mut session).await;
        Ok(session)
    }
}
