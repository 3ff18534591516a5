//! Adjust Inventory Use Case
//!
//! The only path that writes to the stock ledger. Corrections are applied in
//! one ledger transaction keyed by count line, then the lines are marked
//! `ADJUSTED`. If the session write is lost after the ledger committed, the
//! next call finds the lines already applied and only marks them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::{EventPublisherPort, StockLedgerPort};
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountSession, CountSessionRepository, RepositoryError};
use crate::domain::shared::{LineId, MovementId, SessionId, TenantContext};

use super::{load_session, publish_events, rejected, save_session};

/// Result of an adjustment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentOutcome {
    /// Session after the run.
    pub session: CountSession,
    /// Movements appended by this call.
    pub movements: Vec<MovementId>,
    /// Lines marked adjusted by this call.
    pub adjusted_lines: Vec<LineId>,
}

impl AdjustmentOutcome {
    /// Check whether the call changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.movements.is_empty() && self.adjusted_lines.is_empty()
    }
}

/// Use case for applying verified variances to the ledger.
pub struct AdjustInventoryUseCase<R, G, E>
where
    R: CountSessionRepository,
    G: StockLedgerPort,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    ledger: Arc<G>,
    event_publisher: Arc<E>,
    max_conflict_retries: u32,
}

impl<R, G, E> AdjustInventoryUseCase<R, G, E>
where
    R: CountSessionRepository,
    G: StockLedgerPort,
    E: EventPublisherPort,
{
    /// Create a new `AdjustInventoryUseCase`.
    pub const fn new(
        session_repo: Arc<R>,
        ledger: Arc<G>,
        event_publisher: Arc<E>,
        max_conflict_retries: u32,
    ) -> Self {
        Self {
            session_repo,
            ledger,
            event_publisher,
            max_conflict_retries,
        }
    }

    /// Apply every outstanding variance. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist for the tenant.
    /// - `InvalidOperation` if the session is not verified.
    /// - `LedgerTransaction` if the ledger rejected the batch; nothing was
    ///   applied and the call can be retried.
    /// - `ConcurrentModification` if retries run out.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<AdjustmentOutcome, CycleCountError> {
        let mut movements = Vec::new();
        let mut attempt = 0;

        loop {
            let mut session = load_session(self.session_repo.as_ref(), ctx, session_id).await?;
            let batch = session
                .pending_adjustments(&ctx.user_id)
                .map_err(|e| rejected("adjust", session_id, e))?;

            if batch.is_empty() {
                tracing::debug!(session_id = %session_id, "Nothing left to adjust");
                return Ok(AdjustmentOutcome {
                    session,
                    movements,
                    adjusted_lines: Vec::new(),
                });
            }

            let receipt = self.ledger.apply_adjustments(&batch).await.map_err(|e| {
                tracing::warn!(
                    session_id = %session_id,
                    lines = batch.adjustments.len(),
                    error = %e,
                    "Ledger rejected adjustment batch"
                );
                CycleCountError::from(e)
            })?;
            movements.extend(receipt.movements.iter().cloned());

            let adjusted_lines: Vec<LineId> = batch
                .adjustments
                .iter()
                .map(|a| a.line_id.clone())
                .filter(|id| receipt.settled_lines().any(|settled| settled == id))
                .collect();
            session.mark_adjusted(&adjusted_lines)?;

            match save_session(self.session_repo.as_ref(), &mut session).await {
                Ok(()) => {
                    tracing::info!(
                        session_id = %session.id(),
                        code = session.code(),
                        tenant_id = %ctx.tenant_id,
                        movements = movements.len(),
                        lines_adjusted = adjusted_lines.len(),
                        already_applied = receipt.already_applied_lines.len(),
                        net_delta = batch.net_delta(),
                        "Count session adjusted"
                    );
                    publish_events(self.event_publisher.as_ref(), &mut session).await;
                    return Ok(AdjustmentOutcome {
                        session,
                        movements,
                        adjusted_lines,
                    });
                }
                Err(RepositoryError::VersionConflict { .. }) if attempt < self.max_conflict_retries => {
                    attempt += 1;
                    tracing::debug!(
                        session_id = %session_id,
                        attempt,
                        "Session changed while adjusting, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NoOpEventPublisher;
    use crate::application::use_cases::test_support::{Fixture, LOCATION, TENANT, ctx};
    use crate::domain::cycle_count::{
        CountEntry, CountStrategy, CreateSessionCommand, LineStatus, SessionStatus,
    };
    use crate::domain::shared::{LocationId, ProductId, TenantId, Timestamp, UserId};
    use crate::infrastructure::ledger::InMemoryStockLedger;
    use crate::infrastructure::persistence::InMemoryCountSessionRepository;

    type UseCase =
        AdjustInventoryUseCase<InMemoryCountSessionRepository, InMemoryStockLedger, NoOpEventPublisher>;

    fn use_case(f: &Fixture) -> UseCase {
        AdjustInventoryUseCase::new(
            Arc::clone(&f.repo),
            Arc::clone(&f.ledger),
            Arc::clone(&f.publisher),
            5,
        )
    }

    async fn verified(f: &Fixture, counts: &[i64]) -> CountSession {
        let mut session = CountSession::create(
            CreateSessionCommand::new(LOCATION, CountStrategy::Full),
            "CC-000007",
            &ctx(),
        )
        .unwrap();
        let snapshot = f
            .ledger
            .location_snapshot(&ctx().tenant_id, &LocationId::new(LOCATION))
            .await
            .unwrap();
        session.start(&snapshot).unwrap();
        let entries: Vec<CountEntry> = session
            .lines()
            .iter()
            .zip(counts)
            .map(|(l, c)| CountEntry::new(l.id().clone(), *c))
            .collect();
        session.record_counts(&entries, Timestamp::now()).unwrap();
        let products: Vec<ProductId> = session
            .lines()
            .iter()
            .map(|l| l.product_id().clone())
            .collect();
        let costs = f.ledger.unit_costs(&ctx().tenant_id, &products).await.unwrap();
        session.complete(&costs).unwrap();
        session.verify(&UserId::new("manager")).unwrap();
        f.repo.insert(&session).await.unwrap();
        session
    }

    fn quantity(f: &Fixture, product: &str) -> Option<i64> {
        f.ledger.product_quantity(&TenantId::new(TENANT), &ProductId::new(product))
    }

    #[tokio::test]
    async fn applies_each_variance_once() {
        let f = Fixture::with_stock(&[10, 5, 0]);
        let session = verified(&f, &[10, 3, 2]).await;
        let uc = use_case(&f);

        let outcome = uc.execute(&ctx(), session.id()).await.unwrap();
        assert_eq!(outcome.movements.len(), 2);
        assert_eq!(outcome.adjusted_lines.len(), 2);
        assert_eq!(outcome.session.status(), SessionStatus::Verified);
        assert_eq!(quantity(&f, "p-0"), Some(10));
        assert_eq!(quantity(&f, "p-1"), Some(3));
        assert_eq!(quantity(&f, "p-2"), Some(2));

        let again = uc.execute(&ctx(), session.id()).await.unwrap();
        assert!(again.is_noop());
        assert_eq!(f.ledger.movements(&TenantId::new(TENANT)).len(), 2);
        assert_eq!(quantity(&f, "p-1"), Some(3));
    }

    #[tokio::test]
    async fn ledger_failure_applies_nothing_and_is_retryable() {
        let f = Fixture::with_stock(&[10, 5, 0]);
        let session = verified(&f, &[10, 3, 2]).await;
        let uc = use_case(&f);

        f.ledger.fail_next_apply("disk full");
        let err = uc.execute(&ctx(), session.id()).await.unwrap_err();
        assert!(matches!(err, CycleCountError::LedgerTransaction { .. }));
        assert!(err.is_retryable());
        assert_eq!(quantity(&f, "p-1"), Some(5));
        assert!(f.ledger.movements(&TenantId::new(TENANT)).is_empty());

        let stored = f
            .repo
            .find_by_id(&ctx().tenant_id, session.id())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.lines().iter().all(|l| l.status() != LineStatus::Adjusted));

        let outcome = uc.execute(&ctx(), session.id()).await.unwrap();
        assert_eq!(outcome.movements.len(), 2);
        assert_eq!(quantity(&f, "p-1"), Some(3));
    }

    #[tokio::test]
    async fn lost_session_write_is_healed_without_double_apply() {
        let f = Fixture::with_stock(&[10, 5]);
        let session = verified(&f, &[12, 5]).await;

        // Ledger committed but the session write never happened.
        let batch = session.pending_adjustments(&ctx().user_id).unwrap();
        f.ledger.apply_adjustments(&batch).await.unwrap();
        assert_eq!(quantity(&f, "p-0"), Some(12));

        let outcome = use_case(&f).execute(&ctx(), session.id()).await.unwrap();
        assert!(outcome.movements.is_empty());
        assert_eq!(outcome.adjusted_lines.len(), 1);
        assert_eq!(quantity(&f, "p-0"), Some(12));
        assert_eq!(f.ledger.movements(&TenantId::new(TENANT)).len(), 1);
        assert!(!outcome.session.has_unadjusted_variance());
    }

    #[tokio::test]
    async fn cancelled_session_cannot_be_adjusted() {
        let f = Fixture::with_stock(&[1]);
        let mut session = CountSession::create(
            CreateSessionCommand::new(LOCATION, CountStrategy::Full),
            "CC-000001",
            &ctx(),
        )
        .unwrap();
        session.cancel().unwrap();
        f.repo.insert(&session).await.unwrap();

        let err = use_case(&f).execute(&ctx(), session.id()).await.unwrap_err();
        assert!(matches!(err, CycleCountError::InvalidOperation { .. }));
    }
}
