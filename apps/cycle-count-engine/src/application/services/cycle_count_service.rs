//! Cycle Count Service
//!
//! Single entry point for every session operation. Each call takes the
//! tenant context of the acting user and delegates to the matching use case.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::{
    EventPublisherPort, LocationDirectoryPort, SequenceGeneratorPort, StockLedgerPort,
};
use crate::application::use_cases::{
    AdjustInventoryUseCase, AdjustmentOutcome, CancelSessionUseCase, CompleteSessionUseCase,
    CreateSessionUseCase, ListingPolicy, QuerySessionsUseCase, RecordCountsUseCase,
    StartSessionUseCase, VerifySessionUseCase,
};
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{
    CountEntry, CountSession, CountSessionRepository, CountSessionSummary, CountStrategy,
    CreateSessionCommand, LocationOverlapPolicy, Page, SamplingEngine, SamplingPolicy,
    SessionFilter, SessionOptions,
};
use crate::domain::shared::{LocationId, SessionId, TenantContext, UserId};

/// Tunables shared by the use cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Random sample tunables.
    pub sampling: SamplingPolicy,
    /// Page size bounds.
    pub listing: ListingPolicy,
    /// Prefix of generated session codes.
    pub code_prefix: String,
    /// Whether open sessions may share a location.
    pub location_overlap: LocationOverlapPolicy,
    /// Reload-and-retry attempts after a version conflict.
    pub max_conflict_retries: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            sampling: SamplingPolicy::default(),
            listing: ListingPolicy::default(),
            code_prefix: "CC".to_string(),
            location_overlap: LocationOverlapPolicy::Allow,
            max_conflict_retries: 5,
        }
    }
}

/// Facade over the cycle count use cases.
pub struct CycleCountService<R, G, L, S, E>
where
    R: CountSessionRepository + 'static,
    G: StockLedgerPort + 'static,
    L: LocationDirectoryPort + 'static,
    S: SequenceGeneratorPort + 'static,
    E: EventPublisherPort + 'static,
{
    create: CreateSessionUseCase<R, L, S, E>,
    start: StartSessionUseCase<R, G, E>,
    record: RecordCountsUseCase<R, E>,
    complete: CompleteSessionUseCase<R, G, E>,
    verify: VerifySessionUseCase<R, E>,
    adjust: AdjustInventoryUseCase<R, G, E>,
    cancel: CancelSessionUseCase<R, E>,
    query: QuerySessionsUseCase<R>,
}

impl<R, G, L, S, E> CycleCountService<R, G, L, S, E>
where
    R: CountSessionRepository + 'static,
    G: StockLedgerPort + 'static,
    L: LocationDirectoryPort + 'static,
    S: SequenceGeneratorPort + 'static,
    E: EventPublisherPort + 'static,
{
    /// Wire every use case over the given ports.
    pub fn new(
        session_repo: Arc<R>,
        ledger: Arc<G>,
        locations: Arc<L>,
        sequence: Arc<S>,
        event_publisher: Arc<E>,
        settings: ServiceSettings,
    ) -> Self {
        let retries = settings.max_conflict_retries;
        Self {
            create: CreateSessionUseCase::new(
                Arc::clone(&session_repo),
                locations,
                sequence,
                Arc::clone(&event_publisher),
                settings.code_prefix,
            ),
            start: StartSessionUseCase::new(
                Arc::clone(&session_repo),
                Arc::clone(&ledger),
                Arc::clone(&event_publisher),
                SamplingEngine::new(settings.sampling),
                settings.location_overlap,
            ),
            record: RecordCountsUseCase::new(
                Arc::clone(&session_repo),
                Arc::clone(&event_publisher),
                retries,
            ),
            complete: CompleteSessionUseCase::new(
                Arc::clone(&session_repo),
                Arc::clone(&ledger),
                Arc::clone(&event_publisher),
            ),
            verify: VerifySessionUseCase::new(
                Arc::clone(&session_repo),
                Arc::clone(&event_publisher),
            ),
            adjust: AdjustInventoryUseCase::new(
                Arc::clone(&session_repo),
                ledger,
                Arc::clone(&event_publisher),
                retries,
            ),
            cancel: CancelSessionUseCase::new(Arc::clone(&session_repo), event_publisher),
            query: QuerySessionsUseCase::new(session_repo, settings.listing),
        }
    }

    /// Create a DRAFT session.
    pub async fn create_session(
        &self,
        ctx: &TenantContext,
        location_id: impl Into<LocationId>,
        strategy: CountStrategy,
        options: SessionOptions,
    ) -> Result<CountSession, CycleCountError> {
        let cmd = CreateSessionCommand::new(location_id, strategy).with_options(options);
        self.create.execute(ctx, cmd).await
    }

    /// Sample the location and open counting.
    pub async fn start_session(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        self.start.execute(ctx, session_id).await
    }

    /// Record physical counts.
    pub async fn record_counts(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
        entries: &[CountEntry],
    ) -> Result<CountSession, CycleCountError> {
        self.record.execute(ctx, session_id, entries).await
    }

    /// Close counting and compute variances.
    pub async fn complete_session(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        self.complete.execute(ctx, session_id).await
    }

    /// Sign off the variances.
    pub async fn verify_session(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
        verifier_id: &UserId,
    ) -> Result<CountSession, CycleCountError> {
        self.verify.execute(ctx, session_id, verifier_id).await
    }

    /// Apply verified variances to the ledger. Safe to call again.
    pub async fn adjust_session(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<AdjustmentOutcome, CycleCountError> {
        self.adjust.execute(ctx, session_id).await
    }

    /// Abandon a session.
    pub async fn cancel_session(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        self.cancel.execute(ctx, session_id).await
    }

    /// Page through session summaries, newest first.
    pub async fn list_sessions(
        &self,
        ctx: &TenantContext,
        filter: &SessionFilter,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<Page<CountSessionSummary>, CycleCountError> {
        self.query.list(ctx, filter, page, page_size).await
    }

    /// Get a session with its lines.
    pub async fn get_session(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        self.query.get(ctx, session_id).await
    }
}
