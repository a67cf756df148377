use crate::model::{DishId, OrderId, RiderId, ShopId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A placed order.
///
/// Created exactly once by the ledger, never deleted. Every reference is fixed at creation;
/// only `is_finish` changes afterwards, from `false` to `true`, when the delivery trigger
/// fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub dish_id: DishId,
    pub shop_id: ShopId,
    pub consumer_id: UserId,
    pub rider_id: RiderId,
    /// Total charge: `dish.price * number + fare`.
    pub price: u64,
    /// Delivery component of `price`.
    pub fare: u64,
    /// Quantity, always at least 1.
    pub number: u32,
    pub start_time: DateTime<Utc>,
    /// Promised delivery instant.
    pub time: DateTime<Utc>,
    pub is_finish: bool,
}

/// Inbound request to buy a dish.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub consumer_id: UserId,
    pub dish_id: DishId,
    /// Signed so that zero and negative quantities can be rejected explicitly.
    pub quantity: i64,
    /// Where to deliver. Falls back to the consumer's stored location when absent.
    pub consumer_position: Option<crate::model::Position>,
}

/// What the buyer gets back from a successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub rider_id: RiderId,
    pub price: u64,
    pub fare: u64,
    pub time: DateTime<Utc>,
}

impl From<&Order> for OrderReceipt {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            rider_id: order.rider_id,
            price: order.price,
            fare: order.fare,
            time: order.time,
        }
    }
}
