//! Cycle count domain services.

mod sampling;
mod session_state_machine;
mod variance_calculator;

pub use sampling::{SamplingEngine, SamplingPolicy};
pub use session_state_machine::SessionStateMachine;
pub use variance_calculator::VarianceCalculator;
