//! Record Counts Use Case
//!
//! Counters work in parallel on the same session. A save that loses the
//! version race reloads the session and replays the batch, so disjoint line
//! sets all land and the same line keeps the newest count.

use std::sync::Arc;

use crate::application::ports::EventPublisherPort;
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountEntry, CountSession, CountSessionRepository, RepositoryError};
use crate::domain::shared::{SessionId, TenantContext, Timestamp};

use super::{load_session, publish_events, rejected, save_session};

/// Use case for recording physical counts.
pub struct RecordCountsUseCase<R, E>
where
    R: CountSessionRepository,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    event_publisher: Arc<E>,
    max_conflict_retries: u32,
}

impl<R, E> RecordCountsUseCase<R, E>
where
    R: CountSessionRepository,
    E: EventPublisherPort,
{
    /// Create a new `RecordCountsUseCase`.
    pub const fn new(session_repo: Arc<R>, event_publisher: Arc<E>, max_conflict_retries: u32) -> Self {
        Self {
            session_repo,
            event_publisher,
            max_conflict_retries,
        }
    }

    /// Record a batch of counts.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session or a line does not exist.
    /// - `InvalidOperation` if the session is not in progress.
    /// - `Validation` if a quantity is negative.
    /// - `ConcurrentModification` if retries run out.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
        entries: &[CountEntry],
    ) -> Result<CountSession, CycleCountError> {
        let at = Timestamp::now();
        let mut attempt = 0;

        loop {
            let mut session = load_session(self.session_repo.as_ref(), ctx, session_id).await?;
            let recorded = session
                .record_counts(entries, at)
                .map_err(|e| rejected("record counts", session_id, e))?;

            match save_session(self.session_repo.as_ref(), &mut session).await {
                Ok(()) => {
                    tracing::info!(
                        session_id = %session.id(),
                        code = session.code(),
                        tenant_id = %ctx.tenant_id,
                        recorded,
                        counted_items = session.counted_items(),
                        total_items = session.total_items(),
                        "Counts recorded"
                    );
                    publish_events(self.event_publisher.as_ref(), &mut session).await;
                    return Ok(session);
                }
                Err(RepositoryError::VersionConflict { .. }) if attempt < self.max_conflict_retries => {
                    attempt += 1;
                    tracing::debug!(
                        session_id = %session_id,
                        attempt,
                        "Session changed while recording counts, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
