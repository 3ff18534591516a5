//! Cancel Session Use Case

use std::sync::Arc;

use crate::application::ports::EventPublisherPort;
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountSession, CountSessionRepository};
use crate::domain::shared::{SessionId, TenantContext};

use super::{load_session, publish_events, rejected, save_session};

/// Use case for abandoning a session before completion.
pub struct CancelSessionUseCase<R, E>
where
    R: CountSessionRepository,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    event_publisher: Arc<E>,
}

impl<R, E> CancelSessionUseCase<R, E>
where
    R: CountSessionRepository,
    E: EventPublisherPort,
{
    /// Create a new `CancelSessionUseCase`.
    pub const fn new(session_repo: Arc<R>, event_publisher: Arc<E>) -> Self {
        Self {
            session_repo,
            event_publisher,
        }
    }

    /// Cancel the session. Lines are kept for audit.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist for the tenant.
    /// - `InvalidOperation` once completed, verified or already cancelled.
    /// - `ConcurrentModification` if another writer saved first.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        let mut session = load_session(self.session_repo.as_ref(), ctx, session_id).await?;
        session
            .cancel()
            .map_err(|e| rejected("cancel", session_id, e))?;
        save_session(self.session_repo.as_ref(), &mut session).await?;

        tracing::info!(
            session_id = %session.id(),
            code = session.code(),
            tenant_id = %ctx.tenant_id,
            "Count session cancelled"
        );

        publish_events(self.event_publisher.as_ref(), &mut session).await;
        Ok(session)
    }
}
