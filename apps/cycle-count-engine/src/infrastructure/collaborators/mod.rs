//! Collaborator Adapters
//!
//! In-memory stand-ins for the platform services the engine calls out to.

mod events;
mod locations;
mod sequence;

pub use events::RecordingEventPublisher;
pub use locations::InMemoryLocationDirectory;
pub use sequence::InMemorySequenceGenerator;
