use super::message::LedgerRequest;
use crate::ledger::{commit_order, Store};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the [`Store`] and applies requests to it strictly one at a time.
///
/// Order commits are stamped with the actor's clock when they are applied, so
/// `start_time` never runs ahead of the commit that wrote it.
pub struct LedgerActor {
    receiver: mpsc::Receiver<LedgerRequest>,
    store: Store,
}

impl LedgerActor {
    pub(super) fn new(receiver: mpsc::Receiver<LedgerRequest>, store: Store) -> Self {
        Self { receiver, store }
    }

    /// Runs until every client has been dropped.
    pub async fn run(mut self) {
        info!(entity_type = "Ledger", "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }

        info!(
            entity_type = "Ledger",
            orders = self.store.order_count(),
            "Shutdown"
        );
    }

    fn handle(&mut self, msg: LedgerRequest) {
        match msg {
            LedgerRequest::RegisterRider { params, respond_to } => {
                let result = self.store.register_rider(params);
                match &result {
                    Ok(id) => info!(rider_id = %id, "Rider registered"),
                    Err(e) => warn!(error = %e, "Rider rejected"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::GetRider { id, respond_to } => {
                let _ = respond_to.send(self.store.rider(id).cloned());
            }
            LedgerRequest::SetActive {
                id,
                active,
                respond_to,
            } => {
                let result = self.store.set_active(id, active);
                debug!(rider_id = %id, active, ?result, "SetActive");
                let _ = respond_to.send(result);
            }
            LedgerRequest::ToggleActive {
                caller,
                id,
                active,
                respond_to,
            } => {
                let result = self.store.toggle_active(caller, id, active);
                match &result {
                    Ok(changed) => info!(rider_id = %id, active, changed, "Rider toggled"),
                    Err(e) => warn!(rider_id = %id, %caller, error = %e, "Toggle refused"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::ReportPosition {
                id,
                position,
                respond_to,
            } => {
                let _ = respond_to.send(self.store.report_position(id, position));
            }
            LedgerRequest::SampleActive { limit, respond_to } => {
                let _ = respond_to.send(self.store.sample_active(limit));
            }
            LedgerRequest::RegisterShop { params, respond_to } => {
                let result = self.store.register_shop(params);
                match &result {
                    Ok(id) => info!(shop_id = %id, "Shop registered"),
                    Err(e) => warn!(error = %e, "Shop rejected"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::GetShop { id, respond_to } => {
                let _ = respond_to.send(self.store.shop(id).cloned());
            }
            LedgerRequest::AddDish { params, respond_to } => {
                let result = self.store.add_dish(params);
                match &result {
                    Ok(id) => info!(dish_id = %id, "Dish added"),
                    Err(e) => warn!(error = %e, "Dish rejected"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::GetDish { id, respond_to } => {
                let _ = respond_to.send(self.store.dish(id).cloned());
            }
            LedgerRequest::Listing { id, respond_to } => {
                let _ = respond_to.send(self.store.listing(id));
            }
            LedgerRequest::CommitOrder {
                decision,
                listing,
                consumer,
                respond_to,
            } => {
                debug!(?decision, "CommitOrder");
                let mut tx = self.store.begin();
                let result = commit_order(&mut tx, &decision, &listing, consumer, Utc::now());
                match &result {
                    Ok(committed) => {
                        tx.commit();
                        info!(
                            order_id = %committed.order.id,
                            rider_id = %decision.rider_id,
                            price = committed.order.price,
                            "Order committed"
                        );
                    }
                    Err(e) => {
                        drop(tx);
                        warn!(rider_id = %decision.rider_id, error = %e, "Commit rolled back");
                    }
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::GetOrder { id, respond_to } => {
                let _ = respond_to.send(self.store.order(id).cloned());
            }
            LedgerRequest::OrdersFor { party, respond_to } => {
                let _ = respond_to.send(self.store.orders_for(party));
            }
            LedgerRequest::CompleteDelivery {
                id,
                now,
                respond_to,
            } => {
                let result = self.store.complete_delivery(id, now);
                debug!(order_id = %id, ?result, "CompleteDelivery");
                let _ = respond_to.send(result);
            }
        }
    }
}
