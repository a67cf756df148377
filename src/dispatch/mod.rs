//! # Dispatcher
//!
//! Picks a rider for one order and prices it. Nothing here mutates state: the result is a
//! [`DispatchDecision`] that the ledger either commits whole or rejects.
//!
//! The rule is nearest-rider over a bounded sample. Among the candidates the rider with the
//! smallest Manhattan distance to the consumer wins, ties going to the lowest rider id. The
//! fare is that distance plus the consumer-to-shop distance, and the promised delivery time
//! is the rider-to-consumer distance in seconds.

pub mod selector;

pub use selector::*;

use crate::cost::{eta, manhattan};
use crate::ledger_actor::OrderError;
use crate::model::{DishListing, Position, Rider, RiderId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Everything a dispatch needs, read before any write happens.
#[derive(Debug, Clone, Copy)]
pub struct DispatchRequest {
    pub consumer_position: Position,
    pub listing: DishListing,
    pub quantity: i64,
}

/// The chosen rider and the prices computed for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchDecision {
    pub rider_id: RiderId,
    /// Rider-to-consumer distance.
    pub distance: u64,
    pub fare: u64,
    /// `listing.price * quantity + fare`.
    pub total_price: u64,
    pub eta: Duration,
    pub quantity: u32,
}

/// Stateless apart from its candidate source; clones share it.
#[derive(Clone)]
pub struct Dispatcher {
    selector: Arc<dyn CandidateSelector>,
}

impl Dispatcher {
    pub fn new(selector: impl CandidateSelector + 'static) -> Self {
        Self {
            selector: Arc::new(selector),
        }
    }

    /// Chooses a rider and prices the order.
    ///
    /// Quantity is validated before the candidate source is consulted.
    #[instrument(skip(self, request), fields(dish_id = %request.listing.dish_id))]
    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchDecision, OrderError> {
        let quantity = validate_quantity(request.quantity)?;
        let candidates = self.selector.candidates(request.consumer_position).await?;

        let Some((rider, distance)) = nearest(request.consumer_position, &candidates) else {
            warn!(sampled = candidates.len(), "No active rider in sample");
            return Err(OrderError::NoRiderAvailable);
        };

        let fare = distance + manhattan(request.consumer_position, request.listing.shop_position);
        let total_price = request
            .listing
            .price
            .checked_mul(u64::from(quantity))
            .and_then(|goods| goods.checked_add(fare))
            .ok_or(OrderError::InvalidQuantity(request.quantity))?;

        debug!(rider_id = %rider.id, distance, fare, total_price, "Dispatched");
        Ok(DispatchDecision {
            rider_id: rider.id,
            distance,
            fare,
            total_price,
            eta: eta(distance),
            quantity,
        })
    }
}

/// Accepts `1..=u32::MAX`.
pub fn validate_quantity(quantity: i64) -> Result<u32, OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    u32::try_from(quantity).map_err(|_| OrderError::InvalidQuantity(quantity))
}

/// The active candidate closest to `consumer`, with its distance.
pub fn nearest(consumer: Position, candidates: &[Rider]) -> Option<(&Rider, u64)> {
    candidates
        .iter()
        .filter(|rider| rider.active)
        .map(|rider| (rider, manhattan(consumer, rider.position)))
        .min_by_key(|(rider, distance)| (*distance, rider.id))
}
