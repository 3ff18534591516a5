//! Persistence Adapters
//!
//! Implementations of the session repository trait.

pub mod in_memory;

pub use in_memory::InMemoryCountSessionRepository;
