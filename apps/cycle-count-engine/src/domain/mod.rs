//! Domain Layer
//!
//! Business rules with no infrastructure dependencies:
//!
//! - **Aggregates**: the count session and its lines
//! - **Value Objects**: identifiers, money, timestamps, statuses
//! - **Domain Events**: records of session transitions
//! - **Domain Services**: state machine, sampling, variance calculation
//! - **Repository Traits**: persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`cycle_count`]: count session lifecycle and reconciliation rules
//! - [`stock_ledger`]: the ledger shapes the engine reads and writes

pub mod cycle_count;
pub mod shared;
pub mod stock_ledger;
