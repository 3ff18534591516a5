//! Wiring

mod container;

pub use container::{Container, InMemoryContainer};
