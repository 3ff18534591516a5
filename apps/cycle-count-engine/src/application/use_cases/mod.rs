//! Application Use Cases
//!
//! One struct per session operation. Each loads the session tenant-scoped,
//! lets the aggregate decide, persists with an optimistic version check and
//! then publishes the drained events.

mod adjust_inventory;
mod cancel_session;
mod complete_session;
mod create_session;
mod query_sessions;
mod record_counts;
mod start_session;
mod verify_session;

pub use adjust_inventory::{AdjustInventoryUseCase, AdjustmentOutcome};
pub use cancel_session::CancelSessionUseCase;
pub use complete_session::CompleteSessionUseCase;
pub use create_session::CreateSessionUseCase;
pub use query_sessions::{ListingPolicy, QuerySessionsUseCase};
pub use record_counts::RecordCountsUseCase;
pub use start_session::StartSessionUseCase;
pub use verify_session::VerifySessionUseCase;

use crate::application::ports::EventPublisherPort;
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountSession, CountSessionRepository, RepositoryError};
use crate::domain::shared::{SessionId, TenantContext};

/// Load a session owned by the caller's tenant.
async fn load_session<R>(
    repo: &R,
    ctx: &TenantContext,
    session_id: &SessionId,
) -> Result<CountSession, CycleCountError>
where
    R: CountSessionRepository + ?Sized,
{
    repo.find_by_id(&ctx.tenant_id, session_id)
        .await?
        .ok_or_else(|| CycleCountError::not_found("CountSession", session_id))
}

/// Compare-and-swap save; the session carries the new version afterwards.
async fn save_session<R>(repo: &R, session: &mut CountSession) -> Result<(), RepositoryError>
where
    R: CountSessionRepository + ?Sized,
{
    let version = repo.save(session).await?;
    session.set_version(version);
    Ok(())
}

/// Publish pending events. Failures are logged, never returned.
async fn publish_events<E>(publisher: &E, session: &mut CountSession)
where
    E: EventPublisherPort + ?Sized,
{
    let events = session.drain_events();
    if events.is_empty() {
        return;
    }
    if let Err(e) = publisher.publish_session_events(events).await {
        tracing::warn!(
            session_id = %session.id(),
            error = %e,
            "Failed to publish session events"
        );
    }
}

/// Log a rejected operation and hand the error back.
fn rejected(operation: &'static str, session_id: &SessionId, err: CycleCountError) -> CycleCountError {
    tracing::warn!(
        operation,
        session_id = %session_id,
        error = %err,
        "Session operation rejected"
    );
    err
}
