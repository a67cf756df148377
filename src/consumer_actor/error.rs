//! Error types for the Consumer actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsumerError {
    #[error("Consumer not found: {0}")]
    NotFound(String),

    /// The consumer data provided is invalid.
    #[error("Consumer validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ConsumerError {
    fn from(msg: String) -> Self {
        ConsumerError::ActorCommunicationError(msg)
    }
}
