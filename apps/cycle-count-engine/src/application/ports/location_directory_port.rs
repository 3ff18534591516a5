//! Location Directory Port (Driven Port)

use async_trait::async_trait;

use super::PortError;
use crate::domain::shared::{LocationId, TenantId};

/// Port for checking that a stock location belongs to a tenant.
#[async_trait]
pub trait LocationDirectoryPort: Send + Sync {
    /// Check whether the tenant owns the location.
    ///
    /// # Errors
    ///
    /// Returns error if the directory is unavailable.
    async fn exists(&self, tenant_id: &TenantId, location_id: &LocationId)
    -> Result<bool, PortError>;
}
