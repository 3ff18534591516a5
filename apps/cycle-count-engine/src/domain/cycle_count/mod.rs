//! Cycle Count Bounded Context
//!
//! Physical inventory reconciliation: sample a location's stock, record human
//! counts, compute variances and hand verified corrections to the ledger.
//!
//! # Key Concepts
//!
//! - **Count Session Aggregate**: owns the lines and the lifecycle
//! - **Session State Machine**: the single transition table
//! - **Sampling Engine**: FULL, ABC_BASED, RANDOM_SAMPLE and SPOT_CHECK selection
//! - **Variance Calculator**: signed quantity, percent and value per line

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{
    CountEntry, CountLine, CountSession, CountSessionSummary, CreateSessionCommand,
    SessionOptions,
};
pub use errors::CycleCountError;
pub use events::CountSessionEvent;
pub use repository::{CountSessionRepository, Page, PageRequest, RepositoryError, SessionFilter};
pub use services::{SamplingEngine, SamplingPolicy, SessionStateMachine, VarianceCalculator};
pub use value_objects::{
    CountStrategy, LineStatus, LocationOverlapPolicy, SessionAction, SessionStatus, Variance,
};
