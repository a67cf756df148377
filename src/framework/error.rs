//! # Framework Errors
//!
//! Transport-level failures shared by every actor and client. Domain errors travel inside
//! [`FrameworkError::EntityError`] and are unpacked again by each client's `map_error`.

/// Errors raised by the actor plumbing itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error when this wraps one of type `E`.
    pub fn entity_error<E: std::error::Error + Clone + 'static>(&self) -> Option<E> {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>().cloned(),
            _ => None,
        }
    }
}
