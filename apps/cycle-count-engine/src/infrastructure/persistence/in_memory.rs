//! In-memory count session repository.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::cycle_count::aggregate::{CountSession, CountSessionSummary};
use crate::domain::cycle_count::repository::{
    CountSessionRepository, Page, PageRequest, RepositoryError, SessionFilter,
};
use crate::domain::shared::{LocationId, SessionId, TenantId};

/// In-memory implementation of `CountSessionRepository`.
///
/// Sessions are stored whole, so a session and its lines always change
/// together. Every write holds the lock for its whole check-and-swap.
#[derive(Debug, Default)]
pub struct InMemoryCountSessionRepository {
    sessions: RwLock<HashMap<SessionId, CountSession>>,
}

impl InMemoryCountSessionRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored sessions across tenants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stored_copy(session: &CountSession, version: u64) -> CountSession {
        let mut stored = session.clone();
        stored.drain_events();
        stored.set_version(version);
        stored
    }
}

#[async_trait]
impl CountSessionRepository for InMemoryCountSessionRepository {
    async fn insert(&self, session: &CountSession) -> Result<u64, RepositoryError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        if sessions.contains_key(session.id()) {
            return Err(RepositoryError::Duplicate {
                key: session.id().to_string(),
            });
        }
        if sessions
            .values()
            .any(|s| s.tenant_id() == session.tenant_id() && s.code() == session.code())
        {
            return Err(RepositoryError::Duplicate {
                key: session.code().to_string(),
            });
        }

        let version = 1;
        sessions.insert(session.id().clone(), Self::stored_copy(session, version));
        Ok(version)
    }

    async fn save(&self, session: &CountSession) -> Result<u64, RepositoryError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        let current = sessions
            .get(session.id())
            .filter(|s| s.tenant_id() == session.tenant_id())
            .map(CountSession::version)
            .ok_or_else(|| RepositoryError::Missing {
                session_id: session.id().clone(),
            })?;

        if current != session.version() {
            return Err(RepositoryError::VersionConflict {
                session_id: session.id().clone(),
                expected: session.version(),
                actual: current,
            });
        }

        let version = current + 1;
        sessions.insert(session.id().clone(), Self::stored_copy(session, version));
        Ok(version)
    }

    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: &SessionId,
    ) -> Result<Option<CountSession>, RepositoryError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(sessions
            .get(id)
            .filter(|s| s.tenant_id() == tenant_id)
            .cloned())
    }

    async fn find_by_location(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
    ) -> Result<Vec<CountSession>, RepositoryError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<CountSession> = sessions
            .values()
            .filter(|s| s.tenant_id() == tenant_id && s.location_id() == location_id)
            .cloned()
            .collect();
        found.sort_by_key(CountSession::created_at);
        Ok(found)
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<Page<CountSessionSummary>, RepositoryError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching: Vec<&CountSession> = sessions
            .values()
            .filter(|s| s.tenant_id() == tenant_id && filter.matches(s))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.code().cmp(a.code()))
        });

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.page_size)
            .map(CountSession::summary)
            .collect();
        Ok(Page::new(items, total, page))
    }
}
