//! Application Services
//!
//! The operation surface callers use. A service bundles the use cases over
//! one set of ports so a caller does not wire them one by one.

mod cycle_count_service;

pub use cycle_count_service::{CycleCountService, ServiceSettings};
