//! Distance and fare arithmetic.
//!
//! All functions are pure and total: coordinates are `u32` and results `u64`, so no input
//! can overflow. One grid unit of distance is one second of delivery time.

use crate::model::Position;
use std::time::Duration;

/// `|x1 - x2| + |y1 - y2|`
pub fn manhattan(a: Position, b: Position) -> u64 {
    u64::from(a.x.abs_diff(b.x)) + u64::from(a.y.abs_diff(b.y))
}

/// Rider-to-consumer leg plus consumer-to-shop leg.
pub fn fare(consumer: Position, rider: Position, shop: Position) -> u64 {
    manhattan(consumer, rider) + manhattan(consumer, shop)
}

/// Time until delivery for a rider already `distance` units from the consumer.
pub fn eta(distance: u64) -> Duration {
    Duration::from_secs(distance)
}
