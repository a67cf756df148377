use crate::model::{NotificationId, Order, OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Sent to the rider and the shop owner once the order is committed.
    OrderPlaced,
    /// Sent to the consumer when the delivery trigger fires.
    OrderDelivered,
}

/// An append-only inbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub order_id: OrderId,
    pub receiver: UserId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub kind: NotificationKind,
    pub order_id: OrderId,
    pub receiver: UserId,
    pub timestamp: DateTime<Utc>,
}

impl NotificationCreate {
    /// Placed notifications are stamped with the order's start, delivered ones with its
    /// promised delivery time.
    pub fn for_order(kind: NotificationKind, order: &Order, receiver: UserId) -> Self {
        let timestamp = match kind {
            NotificationKind::OrderPlaced => order.start_time,
            NotificationKind::OrderDelivered => order.time,
        };
        Self {
            kind,
            order_id: order.id,
            receiver,
            timestamp,
        }
    }

    pub fn render(&self) -> String {
        match self.kind {
            NotificationKind::OrderPlaced => {
                format!("You have a new order {}! {}", self.order_id, self.timestamp)
            }
            NotificationKind::OrderDelivered => {
                format!("Your order {} has been delivered! {}", self.order_id, self.timestamp)
            }
        }
    }
}
