//! Sequence Generator Port (Driven Port)
//!
//! Issues human-readable, tenant-unique codes such as `CC-000042`.

use async_trait::async_trait;

use super::PortError;
use crate::domain::shared::TenantId;

/// Port for issuing human-readable document numbers.
#[async_trait]
pub trait SequenceGeneratorPort: Send + Sync {
    /// Next code for `prefix` within the tenant. Never repeats.
    ///
    /// # Errors
    ///
    /// Returns error if the generator is unavailable.
    async fn next(&self, prefix: &str, tenant_id: &TenantId) -> Result<String, PortError>;
}
