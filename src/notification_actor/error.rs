use crate::model::NotificationId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// Notifications are append-only.
    #[error("Notification {0} cannot be changed")]
    Immutable(NotificationId),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for NotificationError {
    fn from(msg: String) -> Self {
        NotificationError::ActorCommunicationError(msg)
    }
}
