//! Error types for the ledger actor: order placement, rider registry and catalog.

use crate::model::{DishId, OrderId, RiderId, ShopId, UserId};
use thiserror::Error;

/// Errors that can occur while placing, committing or completing an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The active-rider pool was empty when the dispatcher looked.
    #[error("No rider available")]
    NoRiderAvailable,

    /// Quantity was zero, negative or too large to price.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The chosen rider went inactive between dispatch and commit. Re-dispatch.
    #[error("Rider no longer available: {0}")]
    RiderNoLongerAvailable(RiderId),

    /// The transaction could not be applied. Nothing was written; retry with a fresh dispatch.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Consumer not found: {0}")]
    ConsumerNotFound(UserId),

    /// Only confirmed accounts may buy.
    #[error("Consumer not confirmed: {0}")]
    ConsumerNotConfirmed(UserId),

    #[error("Dish not found: {0}")]
    DishNotFound(DishId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    /// Whether the caller may try the same placement again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrderError::RiderNoLongerAvailable(_) | OrderError::StorageFailure(_)
        )
    }
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

/// Errors from the rider registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RiderError {
    #[error("Rider not found: {0}")]
    NotFound(RiderId),

    /// A user tried to toggle a rider profile they do not own.
    #[error("{caller} may not change {rider}")]
    Forbidden { caller: UserId, rider: RiderId },

    #[error("No rider ids left")]
    IdsExhausted,

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for RiderError {
    fn from(msg: String) -> Self {
        RiderError::ActorCommunicationError(msg)
    }
}

/// Errors from shop and dish registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Shop not found: {0}")]
    ShopNotFound(ShopId),

    #[error("Dish price must be positive")]
    InvalidPrice,

    #[error("No {0} ids left")]
    IdsExhausted(&'static str),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CatalogError {
    fn from(msg: String) -> Self {
        CatalogError::ActorCommunicationError(msg)
    }
}
