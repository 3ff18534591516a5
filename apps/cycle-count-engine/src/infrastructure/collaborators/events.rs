//! Event publisher that keeps what it was given.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::cycle_count::events::CountSessionEvent;

/// Event publisher that records events in memory.
///
/// Can be switched to failing mode to exercise publish error handling.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<CountSessionEvent>>,
    failing: Mutex<Option<String>>,
}

impl RecordingEventPublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every publish with this message until `recover` is called.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failing.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Accept publishes again.
    pub fn recover(&self) {
        *self.failing.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Events published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<CountSessionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Event type names published so far.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(CountSessionEvent::event_type)
            .collect()
    }
}

#[async_trait]
impl EventPublisherPort for RecordingEventPublisher {
    async fn publish_session_events(
        &self,
        events: Vec<CountSessionEvent>,
    ) -> Result<(), EventPublishError> {
        if let Some(message) = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(EventPublishError::ConnectionError { message });
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(events);
        Ok(())
    }
}
