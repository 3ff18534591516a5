//! Create Session Use Case

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, LocationDirectoryPort, SequenceGeneratorPort};
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::{CountSession, CountSessionRepository, CreateSessionCommand};
use crate::domain::shared::TenantContext;

use super::publish_events;

/// Use case for opening a draft count session.
pub struct CreateSessionUseCase<R, L, S, E>
where
    R: CountSessionRepository,
    L: LocationDirectoryPort,
    S: SequenceGeneratorPort,
    E: EventPublisherPort,
{
    session_repo: Arc<R>,
    locations: Arc<L>,
    sequence: Arc<S>,
    event_publisher: Arc<E>,
    code_prefix: String,
}

impl<R, L, S, E> CreateSessionUseCase<R, L, S, E>
where
    R: CountSessionRepository,
    L: LocationDirectoryPort,
    S: SequenceGeneratorPort,
    E: EventPublisherPort,
{
    /// Create a new `CreateSessionUseCase`.
    pub fn new(
        session_repo: Arc<R>,
        locations: Arc<L>,
        sequence: Arc<S>,
        event_publisher: Arc<E>,
        code_prefix: impl Into<String>,
    ) -> Self {
        Self {
            session_repo,
            locations,
            sequence,
            event_publisher,
            code_prefix: code_prefix.into(),
        }
    }

    /// Create a draft session.
    ///
    /// # Errors
    ///
    /// - `Validation` if the command is incomplete for its strategy.
    /// - `NotFound` if the location does not belong to the tenant.
    /// - `Storage` if a collaborator fails.
    pub async fn execute(
        &self,
        ctx: &TenantContext,
        cmd: CreateSessionCommand,
    ) -> Result<CountSession, CycleCountError> {
        // 1. Validate before spending a code
        cmd.validate()?;

        // 2. Location must belong to the tenant
        if !self.locations.exists(&ctx.tenant_id, &cmd.location_id).await? {
            tracing::warn!(
                tenant_id = %ctx.tenant_id,
                location_id = %cmd.location_id,
                "Count requested for unknown location"
            );
            return Err(CycleCountError::not_found("Location", &cmd.location_id));
        }

        // 3. Issue the human-readable code
        let code = self.sequence.next(&self.code_prefix, &ctx.tenant_id).await?;

        // 4. Build and store the draft
        let mut session = CountSession::create(cmd, code, ctx)?;
        let version = self.session_repo.insert(&session).await?;
        session.set_version(version);

        tracing::info!(
            session_id = %session.id(),
            code = session.code(),
            tenant_id = %ctx.tenant_id,
            location_id = %session.location_id(),
            strategy = %session.strategy(),
            "Count session created"
        );

        publish_events(self.event_publisher.as_ref(), &mut session).await;
        Ok(session)
    }
}
