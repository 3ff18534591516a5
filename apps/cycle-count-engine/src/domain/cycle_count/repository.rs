//! Count Session Repository Trait
//!
//! Persistence abstraction for sessions and their lines. A session and its
//! lines are always written together; adapters must make each write atomic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::aggregate::{CountSession, CountSessionSummary};
use super::errors::CycleCountError;
use super::value_objects::SessionStatus;
use crate::domain::shared::{LocationId, SessionId, TenantId};

/// Errors raised by session repositories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Optimistic concurrency check failed.
    #[error("Session {session_id} version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// Contended session.
        session_id: SessionId,
        /// Version the writer loaded.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Session id or code already taken.
    #[error("Session already exists: {key}")]
    Duplicate {
        /// Conflicting id or code.
        key: String,
    },

    /// Session disappeared between load and save.
    #[error("Session not found: {session_id}")]
    Missing {
        /// Session that was expected.
        session_id: SessionId,
    },

    /// Backend failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for CycleCountError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::VersionConflict { session_id, .. } => {
                Self::ConcurrentModification { session_id }
            }
            RepositoryError::Missing { session_id } => Self::not_found("CountSession", session_id),
            RepositoryError::Duplicate { .. } | RepositoryError::Storage(_) => Self::Storage {
                message: err.to_string(),
            },
        }
    }
}

/// Listing filter. Every field narrows the result; `None` matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFilter {
    /// Only sessions in this status.
    pub status: Option<SessionStatus>,
    /// Only sessions at this location.
    pub location_id: Option<LocationId>,
    /// Case-insensitive substring of code or notes.
    pub search_text: Option<String>,
}

impl SessionFilter {
    /// Filter by status.
    #[must_use]
    pub const fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by location.
    #[must_use]
    pub fn with_location(mut self, location_id: impl Into<LocationId>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// Filter by search text.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Check whether a session passes the filter.
    #[must_use]
    pub fn matches(&self, session: &CountSession) -> bool {
        if self.status.is_some_and(|s| s != session.status()) {
            return false;
        }
        if self
            .location_id
            .as_ref()
            .is_some_and(|l| l != session.location_id())
        {
            return false;
        }
        match self.search_text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                session.code().to_lowercase().contains(&needle)
                    || session
                        .notes()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            }
        }
    }
}

/// A 1-based page request. Sizes are clamped by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
}

impl PageRequest {
    /// Create a page request. Page 0 is treated as page 1 and size 0 as 1.
    #[must_use]
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Items across all pages.
    pub total: usize,
    /// Page number, starting at 1.
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// `ceil(total / page_size)`.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Assemble a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total.div_ceil(request.page_size),
        }
    }
}

/// Repository trait for count session persistence.
///
/// Every lookup is tenant-scoped: a session of another tenant is reported as
/// absent.
#[async_trait]
pub trait CountSessionRepository: Send + Sync {
    /// Store a new session. Returns the stored version.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the id or the tenant's code is taken.
    async fn insert(&self, session: &CountSession) -> Result<u64, RepositoryError>;

    /// Replace a stored session if its version is unchanged since load.
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if another writer saved first.
    async fn save(&self, session: &CountSession) -> Result<u64, RepositoryError>;

    /// Find a session with its lines.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: &SessionId,
    ) -> Result<Option<CountSession>, RepositoryError>;

    /// Find every session targeting a location.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_location(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
    ) -> Result<Vec<CountSession>, RepositoryError>;

    /// List session summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(
        &self,
        tenant_id: &TenantId,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<Page<CountSessionSummary>, RepositoryError>;
}
