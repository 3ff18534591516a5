//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::ports::{
    EventPublisherPort, LocationDirectoryPort, SequenceGeneratorPort, StockLedgerPort,
};
use crate::application::services::{CycleCountService, ServiceSettings};
use crate::application::use_cases::{
    AdjustInventoryUseCase, CancelSessionUseCase, CompleteSessionUseCase, CreateSessionUseCase,
    QuerySessionsUseCase, RecordCountsUseCase, StartSessionUseCase, VerifySessionUseCase,
};
use crate::config::Config;
use crate::domain::cycle_count::{CountSessionRepository, SamplingEngine};
use crate::infrastructure::collaborators::{
    InMemoryLocationDirectory, InMemorySequenceGenerator, RecordingEventPublisher,
};
use crate::infrastructure::ledger::InMemoryStockLedger;
use crate::infrastructure::persistence::InMemoryCountSessionRepository;

/// Container over the in-memory adapters.
pub type InMemoryContainer = Container<
    InMemoryCountSessionRepository,
    InMemoryStockLedger,
    InMemoryLocationDirectory,
    InMemorySequenceGenerator,
    RecordingEventPublisher,
>;

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            sampling: config.sampling.policy(),
            listing: config.listing.policy(),
            code_prefix: config.sessions.code_prefix.clone(),
            location_overlap: config.sessions.location_overlap,
            max_conflict_retries: config.sessions.max_conflict_retries,
        }
    }
}

/// Dependency injection container.
///
/// Holds all wired dependencies for the engine.
pub struct Container<R, G, L, S, E>
where
    R: CountSessionRepository + 'static,
    G: StockLedgerPort + 'static,
    L: LocationDirectoryPort + 'static,
    S: SequenceGeneratorPort + 'static,
    E: EventPublisherPort + 'static,
{
    // Ports
    session_repo: Arc<R>,
    ledger: Arc<G>,
    locations: Arc<L>,
    sequence: Arc<S>,
    event_publisher: Arc<E>,

    settings: ServiceSettings,
}

impl InMemoryContainer {
    /// Container over fresh in-memory adapters.
    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            Arc::new(InMemoryCountSessionRepository::new()),
            Arc::new(InMemoryStockLedger::new()),
            Arc::new(InMemoryLocationDirectory::new()),
            Arc::new(InMemorySequenceGenerator::new()),
            Arc::new(RecordingEventPublisher::new()),
            config,
        )
    }
}

impl<R, G, L, S, E> Container<R, G, L, S, E>
where
    R: CountSessionRepository + 'static,
    G: StockLedgerPort + 'static,
    L: LocationDirectoryPort + 'static,
    S: SequenceGeneratorPort + 'static,
    E: EventPublisherPort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(
        session_repo: Arc<R>,
        ledger: Arc<G>,
        locations: Arc<L>,
        sequence: Arc<S>,
        event_publisher: Arc<E>,
        config: &Config,
    ) -> Self {
        Self {
            session_repo,
            ledger,
            locations,
            sequence,
            event_publisher,
            settings: ServiceSettings::from(config),
        }
    }

    /// Get the session repository.
    pub fn session_repo(&self) -> Arc<R> {
        Arc::clone(&self.session_repo)
    }

    /// Get the stock ledger port.
    pub fn ledger(&self) -> Arc<G> {
        Arc::clone(&self.ledger)
    }

    /// Get the location directory port.
    pub fn locations(&self) -> Arc<L> {
        Arc::clone(&self.locations)
    }

    /// Get the sequence generator port.
    pub fn sequence(&self) -> Arc<S> {
        Arc::clone(&self.sequence)
    }

    /// Get the event publisher port.
    pub fn event_publisher(&self) -> Arc<E> {
        Arc::clone(&self.event_publisher)
    }

    /// Get the settings derived from configuration.
    pub const fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Create a `CreateSessionUseCase`.
    pub fn create_session_use_case(&self) -> CreateSessionUseCase<R, L, S, E> {
        CreateSessionUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.locations),
            Arc::clone(&self.sequence),
            Arc::clone(&self.event_publisher),
            self.settings.code_prefix.clone(),
        )
    }

    /// Create a `StartSessionUseCase`.
    pub fn start_session_use_case(&self) -> StartSessionUseCase<R, G, E> {
        StartSessionUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.ledger),
            Arc::clone(&self.event_publisher),
            SamplingEngine::new(self.settings.sampling),
            self.settings.location_overlap,
        )
    }

    /// Create a `RecordCountsUseCase`.
    pub fn record_counts_use_case(&self) -> RecordCountsUseCase<R, E> {
        RecordCountsUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.event_publisher),
            self.settings.max_conflict_retries,
        )
    }

    /// Create a `CompleteSessionUseCase`.
    pub fn complete_session_use_case(&self) -> CompleteSessionUseCase<R, G, E> {
        CompleteSessionUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.ledger),
            Arc::clone(&self.event_publisher),
        )
    }

    /// Create a `VerifySessionUseCase`.
    pub fn verify_session_use_case(&self) -> VerifySessionUseCase<R, E> {
        VerifySessionUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.event_publisher),
        )
    }

    /// Create an `AdjustInventoryUseCase`.
    pub fn adjust_inventory_use_case(&self) -> AdjustInventoryUseCase<R, G, E> {
        AdjustInventoryUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.ledger),
            Arc::clone(&self.event_publisher),
            self.settings.max_conflict_retries,
        )
    }

    /// Create a `CancelSessionUseCase`.
    pub fn cancel_session_use_case(&self) -> CancelSessionUseCase<R, E> {
        CancelSessionUseCase::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.event_publisher),
        )
    }

    /// Create a `QuerySessionsUseCase`.
    pub fn query_sessions_use_case(&self) -> QuerySessionsUseCase<R> {
        QuerySessionsUseCase::new(Arc::clone(&self.session_repo), self.settings.listing)
    }

    /// Create the service facade over every use case.
    pub fn service(&self) -> CycleCountService<R, G, L, S, E> {
        CycleCountService::new(
            Arc::clone(&self.session_repo),
            Arc::clone(&self.ledger),
            Arc::clone(&self.locations),
            Arc::clone(&self.sequence),
            Arc::clone(&self.event_publisher),
            self.settings.clone(),
        )
    }
}
