//! Sequence generator keeping one counter per tenant and prefix.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::ports::{PortError, SequenceGeneratorPort};
use crate::domain::shared::TenantId;

/// In-memory implementation of `SequenceGeneratorPort`.
///
/// Codes are `{prefix}-{n:06}`, starting at 1.
#[derive(Debug, Default)]
pub struct InMemorySequenceGenerator {
    counters: Mutex<HashMap<(TenantId, String), u64>>,
}

impl InMemorySequenceGenerator {
    /// Create a generator with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceGeneratorPort for InMemorySequenceGenerator {
    async fn next(&self, prefix: &str, tenant_id: &TenantId) -> Result<String, PortError> {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let counter = counters
            .entry((tenant_id.clone(), prefix.to_string()))
            .or_insert(0);
        *counter += 1;
        Ok(format!("{prefix}-{:06}", *counter))
    }
}
