//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer, following
//! hexagonal architecture:
//!
//! - `persistence/`: Count session repository
//! - `ledger/`: Stock ledger (product totals, location stock, movement log)
//! - `collaborators/`: Sequence generator, location directory, event sink
//! - `config/`: Dependency injection container

pub mod collaborators;
pub mod config;
pub mod ledger;
pub mod persistence;
