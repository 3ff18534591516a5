//! Location directory backed by a set of registered locations.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{LocationDirectoryPort, PortError};
use crate::domain::shared::{LocationId, TenantId};

/// In-memory implementation of `LocationDirectoryPort`.
#[derive(Debug, Default)]
pub struct InMemoryLocationDirectory {
    locations: RwLock<HashSet<(TenantId, LocationId)>>,
}

impl InMemoryLocationDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location as owned by a tenant.
    pub fn register(&self, tenant_id: impl Into<TenantId>, location_id: impl Into<LocationId>) {
        self.locations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((tenant_id.into(), location_id.into()));
    }
}

#[async_trait]
impl LocationDirectoryPort for InMemoryLocationDirectory {
    async fn exists(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
    ) -> Result<bool, PortError> {
        Ok(self
            .locations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(tenant_id.clone(), location_id.clone())))
    }
}
