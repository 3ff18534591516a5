//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing session events to external systems.

use async_trait::async_trait;

use crate::domain::cycle_count::events::CountSessionEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Connection error.
    #[error("Event publish connection error: {message}")]
    ConnectionError {
        /// Error message.
        message: String,
    },
}

/// Port for publishing domain events.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish session events.
    async fn publish_session_events(
        &self,
        events: Vec<CountSessionEvent>,
    ) -> Result<(), EventPublishError>;

    /// Publish a single session event.
    async fn publish_session_event(&self, event: CountSessionEvent) -> Result<(), EventPublishError> {
        self.publish_session_events(vec![event]).await
    }
}

/// No-op event publisher.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_session_events(
        &self,
        _events: Vec<CountSessionEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }
}
