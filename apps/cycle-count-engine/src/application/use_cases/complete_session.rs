//! Complete Session Use Case

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, LedgerError, StockLedgerPort};
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountSession, CountSessionRepository, SessionAction};
use crate::domain::shared::{ProductId, SessionId, TenantContext};

use super::{load_session, publish_events, rejected, save_session};

/// Use case for closing counting and computing variances.
pub struct CompleteSessionUseCase<R, G, E>
where
    R: CountSessionRepository,
    G: StockLedgerPort,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    ledger: Arc<G>,
    event_publisher: Arc<E>,
}

impl<R, G, E> CompleteSessionUseCase<R, G, E>
where
    R: CountSessionRepository,
    G: StockLedgerPort,
    E: EventPublisherPort,
{
    /// Create a new `CompleteSessionUseCase`.
    pub const fn new(session_repo: Arc<R>, ledger: Arc<G>, event_publisher: Arc<E>) -> Self {
        Self {
            session_repo,
            ledger,
            event_publisher,
        }
    }

    /// Complete the session using each product's current cost basis.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session or a product's cost does not exist.
    /// - `InvalidOperation` if the session is not in progress.
    /// - `IncompleteCount` listing the uncounted lines.
    /// - `ConcurrentModification` if another writer saved first.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        let mut session = load_session(self.session_repo.as_ref(), ctx, session_id).await?;
        session
            .ensure_can(SessionAction::Complete)
            .map_err(|e| rejected("complete", session_id, e))?;

        let products: Vec<ProductId> = session
            .lines()
            .iter()
            .map(|l| l.product_id().clone())
            .collect();
        let unit_costs = self
            .ledger
            .unit_costs(&ctx.tenant_id, &products)
            .await
            .map_err(LedgerError::into_read_error)?;

        session
            .complete(&unit_costs)
            .map_err(|e| rejected("complete", session_id, e))?;
        save_session(self.session_repo.as_ref(), &mut session).await?;

        tracing::info!(
            session_id = %session.id(),
            code = session.code(),
            tenant_id = %ctx.tenant_id,
            variance_count = session.variance_count(),
            variance_value = %session.variance_value(),
            "Count session completed"
        );

        publish_events(self.event_publisher.as_ref(), &mut session).await;
        Ok(session)
    }
}
