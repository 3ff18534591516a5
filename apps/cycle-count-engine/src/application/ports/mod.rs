//! Application Ports (Driven)
//!
//! Interfaces the engine uses to reach the wider platform. Adapters live in
//! the infrastructure layer.

mod collaborator_error;
mod event_publisher_port;
mod location_directory_port;
mod sequence_generator_port;
mod stock_ledger_port;

pub use collaborator_error::PortError;
pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use location_directory_port::LocationDirectoryPort;
pub use sequence_generator_port::SequenceGeneratorPort;
pub use stock_ledger_port::{LedgerError, StockLedgerPort};
