//! Query Sessions Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{
    CountSession, CountSessionRepository, CountSessionSummary, Page, PageRequest, SessionFilter,
};
use crate::domain::shared::{SessionId, TenantContext};

use super::load_session;

/// Page size bounds for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPolicy {
    /// Size used when the caller gives none.
    pub default_page_size: usize,
    /// Largest size a caller may ask for.
    pub max_page_size: usize,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 200,
        }
    }
}

impl ListingPolicy {
    /// Build a page request from optional caller input.
    #[must_use]
    pub fn page_request(&self, page: Option<usize>, page_size: Option<usize>) -> PageRequest {
        let size = page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1));
        PageRequest::new(page.unwrap_or(1), size)
    }
}

/// Read-side use case for sessions.
pub struct QuerySessionsUseCase<R>
where
    R: CountSessionRepository,
{
    session_repo: Arc<R>,
    listing: ListingPolicy,
}

impl<R> QuerySessionsUseCase<R>
where
    R: CountSessionRepository,
{
    /// Create a new `QuerySessionsUseCase`.
    pub const fn new(session_repo: Arc<R>, listing: ListingPolicy) -> Self {
        Self {
            session_repo,
            listing,
        }
    }

    /// Get a session with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist for the tenant.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        session_id: &SessionId,
    ) -> Result<CountSession, CycleCountError> {
        load_session(self.session_repo.as_ref(), ctx, session_id).await
    }

    /// List session summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the repository fails.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        filter: &SessionFilter,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<Page<CountSessionSummary>, CycleCountError> {
        let request = self.listing.page_request(page, page_size);
        let result = self
            .session_repo
            .list(&ctx.tenant_id, filter, request)
            .await?;

        tracing::debug!(
            tenant_id = %ctx.tenant_id,
            total = result.total,
            page = result.page,
            "Listed count sessions"
        );
        Ok(result)
    }
}
