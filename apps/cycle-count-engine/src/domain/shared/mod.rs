//! Shared Domain Types
//!
//! Value objects shared across bounded contexts.

pub mod value_objects;

pub use value_objects::{
    LineId, LocationId, Money, MovementId, ProductId, SessionId, TenantContext, TenantId,
    Timestamp, UserId,
};
