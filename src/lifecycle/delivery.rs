//! Timer that fires the delivery-completion trigger.
//!
//! Nothing in the core starts these. Call [`schedule_delivery`] after a placement to have
//! the order finished, and the consumer notified, once its promised time arrives.

use crate::clients::{Completion, OrderClient};
use crate::ledger::DeliveryOutcome;
use crate::model::Order;
use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Sleeps until `order.time`, then completes the delivery.
///
/// The wait is measured on tokio's clock, so it can be driven by a paused test runtime.
/// The trigger is stamped with the later of the wall clock and the promised time, so an
/// early wake-up still counts as due. The returned task ends once the consumer's
/// notification has been appended.
pub fn schedule_delivery(orders: OrderClient, order: &Order) -> JoinHandle<()> {
    let id = order.id;
    let due = order.time;
    let wait = (due - Utc::now()).to_std().unwrap_or_default();

    tokio::spawn(async move {
        tokio::time::sleep(wait).await;
        match orders.deliver(id, Utc::now().max(due)).await {
            Ok(Completion {
                outcome: DeliveryOutcome::Delivered(_),
                notification,
            }) => {
                info!(order_id = %id, "Delivery timer fired");
                if let Some(notification) = notification {
                    if let Err(e) = notification.await {
                        warn!(order_id = %id, error = %e, "Delivery notification task failed");
                    }
                }
            }
            Ok(completion) => {
                info!(order_id = %id, outcome = ?completion.outcome, "Delivery timer found nothing to do");
            }
            Err(e) => warn!(order_id = %id, error = %e, "Delivery timer failed"),
        }
    })
}
