//! Cycle count value objects.

mod count_strategy;
mod line_status;
mod location_overlap;
mod session_action;
mod session_status;
mod variance;

pub use count_strategy::CountStrategy;
pub use line_status::LineStatus;
pub use location_overlap::LocationOverlapPolicy;
pub use session_action::SessionAction;
pub use session_status::SessionStatus;
pub use variance::Variance;
