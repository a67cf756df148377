use crate::clients::{ConsumerClient, LedgerClient, NotificationSink};
use crate::dispatch::{DispatchRequest, Dispatcher};
use crate::framework::ActorClient;
use crate::ledger::{CommittedOrder, DeliveryOutcome};
use crate::ledger_actor::OrderError;
use crate::model::{NotificationKind, Order, OrderId, OrderReceipt, PlaceOrder, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn, Instrument, Span};

/// Default number of dispatch-and-commit rounds per placement.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A committed order and the tasks appending its `OrderPlaced` notifications.
#[derive(Debug)]
pub struct Placement {
    pub receipt: OrderReceipt,
    pub notifications: Vec<JoinHandle<()>>,
}

/// A delivery trigger's outcome and, when it finished the order, the consumer's notification.
#[derive(Debug)]
pub struct Completion {
    pub outcome: DeliveryOutcome,
    pub notification: Option<JoinHandle<()>>,
}

/// Entry point for buying a dish and completing its delivery.
///
/// Placement reads the consumer and the dish listing, asks the [`Dispatcher`] for a rider and
/// hands the decision to the ledger, which commits it whole or not at all. If the rider went
/// off shift in between, the whole round is repeated against fresh data, up to
/// `max_attempts` times.
///
/// Each commit and its notifications run on one spawned task. A caller that is dropped
/// while the ledger works on its commit does not stop the notifications.
#[derive(Clone)]
pub struct OrderClient {
    ledger: LedgerClient,
    consumers: ConsumerClient,
    dispatcher: Dispatcher,
    notifier: Arc<dyn NotificationSink>,
    max_attempts: u32,
}

impl OrderClient {
    pub fn new(
        ledger: LedgerClient,
        consumers: ConsumerClient,
        dispatcher: Dispatcher,
        notifier: Arc<dyn NotificationSink>,
        max_attempts: u32,
    ) -> Self {
        Self {
            ledger,
            consumers,
            dispatcher,
            notifier,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Places the order and returns its receipt.
    pub async fn place_order(&self, request: PlaceOrder) -> Result<OrderReceipt, OrderError> {
        self.place(request).await.map(|placement| placement.receipt)
    }

    /// Like [`OrderClient::place_order`], also handing back the notification tasks.
    #[instrument(skip(self, request), fields(consumer_id = %request.consumer_id, dish_id = %request.dish_id))]
    pub async fn place(&self, request: PlaceOrder) -> Result<Placement, OrderError> {
        debug!(?request, "place_order called");

        let consumer = self
            .consumers
            .get(request.consumer_id)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
            .ok_or(OrderError::ConsumerNotFound(request.consumer_id))?;
        if !consumer.confirmed {
            return Err(OrderError::ConsumerNotConfirmed(consumer.id));
        }
        let consumer_position = request.consumer_position.unwrap_or(consumer.position);

        let mut attempt = 1;
        loop {
            let listing = self
                .ledger
                .dish_listing(request.dish_id)
                .await?
                .ok_or(OrderError::DishNotFound(request.dish_id))?;
            let decision = self
                .dispatcher
                .dispatch(&DispatchRequest {
                    consumer_position,
                    listing,
                    quantity: request.quantity,
                })
                .await?;

            let ledger = self.ledger.clone();
            let notifier = self.notifier.clone();
            let consumer_id = consumer.id;
            let committing = tokio::spawn(
                async move {
                    let committed = ledger.commit_order(decision, listing, consumer_id).await?;
                    let notifications = announce(notifier.as_ref(), &committed);
                    Ok::<_, OrderError>((committed.order, notifications))
                }
                .instrument(Span::current()),
            );
            let result = committing
                .await
                .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;

            match result {
                Ok((order, notifications)) => {
                    info!(
                        order_id = %order.id,
                        rider_id = %order.rider_id,
                        attempt,
                        "Order placed"
                    );
                    return Ok(Placement {
                        receipt: OrderReceipt::from(&order),
                        notifications,
                    });
                }
                Err(OrderError::RiderNoLongerAvailable(rider_id)) if attempt < self.max_attempts => {
                    warn!(attempt, %rider_id, "Rider went off shift, dispatching again");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Finishes the order if its delivery time has passed and tells the consumer. Safe to call
    /// more than once; only the first effective call notifies.
    pub async fn complete_delivery(
        &self,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<DeliveryOutcome, OrderError> {
        self.deliver(id, now).await.map(|completion| completion.outcome)
    }

    /// Like [`OrderClient::complete_delivery`], also handing back the notification task.
    #[instrument(skip(self))]
    pub async fn deliver(&self, id: OrderId, now: DateTime<Utc>) -> Result<Completion, OrderError> {
        let ledger = self.ledger.clone();
        let notifier = self.notifier.clone();
        let completing = tokio::spawn(
            async move {
                let outcome = ledger.complete_delivery(id, now).await?;
                let notification = match &outcome {
                    DeliveryOutcome::Delivered(order) => {
                        info!(order_id = %id, "Delivered");
                        Some(notifier.notify(order.consumer_id, order, NotificationKind::OrderDelivered))
                    }
                    DeliveryOutcome::AlreadyDelivered => {
                        debug!(order_id = %id, "Already delivered");
                        None
                    }
                    DeliveryOutcome::NotDue { due } => {
                        debug!(order_id = %id, %due, "Not due yet");
                        None
                    }
                };
                Ok::<_, OrderError>(Completion {
                    outcome,
                    notification,
                })
            }
            .instrument(Span::current()),
        );
        completing
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.ledger.get_order(id).await
    }

    pub async fn orders_for_consumer(&self, id: UserId) -> Result<Vec<Order>, OrderError> {
        self.ledger.orders_for_consumer(id).await
    }
}

/// `OrderPlaced` for the rider's user and the shop owner.
fn announce(notifier: &dyn NotificationSink, committed: &CommittedOrder) -> Vec<JoinHandle<()>> {
    let order = &committed.order;
    [committed.rider_user, committed.shop_owner]
        .into_iter()
        .map(|receiver| notifier.notify(receiver, order, NotificationKind::OrderPlaced))
        .collect()
}
