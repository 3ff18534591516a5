//! Caller context for tenant-scoped operations.

use serde::{Deserialize, Serialize};

use super::{TenantId, UserId};

/// The tenant and acting user behind an engine call.
///
/// Authentication happens upstream; the engine trusts this context and uses it
/// to scope every lookup and to stamp creator/verifier identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Acting user.
    pub user_id: UserId,
}

impl TenantContext {
    /// Create a new context.
    #[must_use]
    pub fn new(tenant_id: impl Into<TenantId>, user_id: impl Into<UserId>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Same tenant, different acting user.
    #[must_use]
    pub fn as_user(&self, user_id: impl Into<UserId>) -> Self {
        Self {
            tenant_id: self.tenant_id.clone(),
            user_id: user_id.into(),
        }
    }
}
