//! Start Session Use Case
//!
//! Snapshots the location, samples lines and flips the session to
//! `IN_PROGRESS` in a single versioned write, so no reader ever sees an
//! in-progress session without lines.

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, LedgerError, StockLedgerPort};
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{
    CountSession, CountSessionRepository, CountStrategy, LocationOverlapPolicy, SamplingEngine,
    SessionAction,
};
use crate::domain::shared::{SessionId, TenantContext};
use crate::domain::stock_ledger::LocationStockLine;

use super::{load_session, publish_events, rejected, save_session};

/// Use case for starting a draft session.
pub struct StartSessionUseCase<R, G, E>
where
    R: CountSessionRepository,
    G: StockLedgerPort,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    ledger: Arc<G>,
    event_publisher: Arc<E>,
    sampling: SamplingEngine,
    overlap: LocationOverlapPolicy,
}

impl<R, G, E> StartSessionUseCase<R, G, E>
where
    R: CountSessionRepository,
    G: StockLedgerPort,
    E: EventPublisherPort,
{
    /// Create a new `StartSessionUseCase`.
    pub const fn new(
        session_repo: Arc<R>,
        ledger: Arc<G>,
        event_publisher: Arc<E>,
        sampling: SamplingEngine,
        overlap: LocationOverlapPolicy,
    ) -> Self {
        Self {
            session_repo,
            ledger,
            event_publisher,
            sampling,
            overlap,
        }
    }

    /// Sample lines and start counting.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist for the tenant.
    /// - `InvalidOperation` if the session is not in draft, or another
    ///   session holds the location under the exclusive policy.
    /// - `NoEligibleItems` if sampling selects nothing.
    /// - `ConcurrentModification` if another writer saved first.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        let mut session = load_session(self.session_repo.as_ref(), ctx, session_id).await?;
        session
            .ensure_can(SessionAction::Start)
            .map_err(|e| rejected("start", session_id, e))?;

        self.ensure_location_free(ctx, &session).await?;

        let snapshot = self
            .ledger
            .location_snapshot(&ctx.tenant_id, session.location_id())
            .await
            .map_err(LedgerError::into_read_error)?;
        let snapshot = narrow_to_spot_check(&session, snapshot);

        let selected =
            self.sampling
                .select_lines(snapshot, session.strategy(), session.abc_filter())?;
        session
            .start(&selected)
            .map_err(|e| rejected("start", session_id, e))?;

        save_session(self.session_repo.as_ref(), &mut session).await?;

        tracing::info!(
            session_id = %session.id(),
            code = session.code(),
            tenant_id = %ctx.tenant_id,
            total_items = session.total_items(),
            "Count session started"
        );

        publish_events(self.event_publisher.as_ref(), &mut session).await;
        Ok(session)
    }

    async fn ensure_location_free(
        &self,
        ctx: &TenantContext,
        session: &CountSession,
    ) -> Result<(), CycleCountError> {
        if self.overlap == LocationOverlapPolicy::Allow {
            return Ok(());
        }

        let others = self
            .session_repo
            .find_by_location(&ctx.tenant_id, session.location_id())
            .await?;
        if let Some(holder) = others
            .iter()
            .find(|other| other.id() != session.id() && other.holds_location())
        {
            return Err(rejected(
                "start",
                session.id(),
                CycleCountError::InvalidOperation {
                    action: SessionAction::Start,
                    status: session.status(),
                    reason: format!(
                        "location {} is held by session {} ({})",
                        session.location_id(),
                        holder.code(),
                        holder.status()
                    ),
                },
            ));
        }
        Ok(())
    }
}

/// SPOT_CHECK counts only the caller's products that are stocked here.
fn narrow_to_spot_check(
    session: &CountSession,
    snapshot: Vec<LocationStockLine>,
) -> Vec<LocationStockLine> {
    if session.strategy() != CountStrategy::SpotCheck {
        return snapshot;
    }
    snapshot
        .into_iter()
        .filter(|line| session.spot_check_products().contains(&line.product_id))
        .collect()
}
