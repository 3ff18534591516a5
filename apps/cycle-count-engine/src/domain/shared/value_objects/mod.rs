//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
mod tenant;
mod timestamp;

pub use identifiers::{LineId, LocationId, MovementId, ProductId, SessionId, TenantId, UserId};
pub use money::Money;
pub use tenant::TenantContext;
pub use timestamp::Timestamp;
