//! Shop and dish records, plus the read-only listing the dispatcher works from.

use crate::model::{DishId, Position, ShopId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    /// Receives `OrderPlaced` notifications for this shop.
    pub owner: UserId,
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct ShopCreate {
    pub owner: UserId,
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub shop_id: ShopId,
    pub name: String,
    /// Unit price, always positive.
    pub price: u64,
    /// Number of orders placed for this dish.
    pub sales: u64,
}

#[derive(Debug, Clone)]
pub struct DishCreate {
    pub shop_id: ShopId,
    pub name: String,
    pub price: u64,
}

/// A dish joined with the location of the shop that cooks it.
///
/// This is what a dispatch decision is computed against; the ledger checks it is still
/// current when the order is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishListing {
    pub dish_id: DishId,
    pub shop_id: ShopId,
    pub price: u64,
    pub shop_position: Position,
}
