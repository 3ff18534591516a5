// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Cycle Count Engine - Rust Core Library
//!
//! Physical inventory reconciliation for the Stockroom retail platform.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `cycle_count`: Count session aggregate, lifecycle, sampling, variance
//!   - `stock_ledger`: Stock snapshot lines, adjustments, movement log entries
//!   - `shared`: Identifiers, money, timestamps, tenant context
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for the platform (`StockLedgerPort`, `SequenceGeneratorPort`)
//!   - `use_cases`: Create, Start, RecordCounts, Complete, Verify, Adjust, Cancel, Query
//!   - `services`: `CycleCountService` facade
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Session repository (in-memory)
//!   - `ledger`: Stock ledger (in-memory)
//!   - `collaborators`: Sequence generator, location directory, event publisher
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Ambient
// =============================================================================

/// YAML configuration loading and validation.
pub mod config;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::cycle_count::{
    CountEntry, CountLine, CountSession, CountSessionSummary, CountStrategy,
    CreateSessionCommand, CycleCountError, LineStatus, LocationOverlapPolicy, Page,
    SessionFilter, SessionOptions, SessionStatus, Variance,
};
pub use domain::shared::{
    LineId, LocationId, Money, ProductId, SessionId, TenantContext, TenantId, Timestamp, UserId,
};
pub use domain::stock_ledger::{AbcClass, LocationStockLine, StockMovement};

// Application re-exports
pub use application::ports::{
    EventPublisherPort, LedgerError, LocationDirectoryPort, NoOpEventPublisher,
    SequenceGeneratorPort, StockLedgerPort,
};
pub use application::services::{CycleCountService, ServiceSettings};
pub use application::use_cases::AdjustmentOutcome;

// Infrastructure re-exports
pub use infrastructure::collaborators::{
    InMemoryLocationDirectory, InMemorySequenceGenerator, RecordingEventPublisher,
};
pub use infrastructure::config::{Container, InMemoryContainer};
pub use infrastructure::ledger::InMemoryStockLedger;
pub use infrastructure::persistence::InMemoryCountSessionRepository;
