//! Error shared by the small lookup collaborators.

use crate::domain::cycle_count::errors::CycleCountError;

/// Failure of a collaborator service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// Service could not be reached.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        /// Collaborator name.
        service: &'static str,
        /// Error message.
        message: String,
    },

    /// Service answered with something unusable.
    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse {
        /// Collaborator name.
        service: &'static str,
        /// Error message.
        message: String,
    },
}

impl From<PortError> for CycleCountError {
    fn from(err: PortError) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}
