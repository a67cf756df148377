use crate::dispatch::DispatchDecision;
use crate::framework::FrameworkError;
use crate::ledger::{CommittedOrder, DeliveryOutcome, OrderParty};
use crate::ledger_actor::{CatalogError, LedgerRequest, OrderError, RiderError};
use crate::model::{
    Dish, DishCreate, DishId, DishListing, Order, OrderId, Position, Rider, RiderCreate, RiderId,
    Shop, ShopCreate, ShopId, UserId,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for the ledger actor: rider registry, catalog and order commits.
#[derive(Clone)]
pub struct LedgerClient {
    sender: mpsc::Sender<LedgerRequest>,
}

impl LedgerClient {
    pub fn new(sender: mpsc::Sender<LedgerRequest>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(oneshot::Sender<R>) -> LedgerRequest,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    // ---- riders ----

    #[instrument(skip(self))]
    pub async fn register_rider(&self, params: RiderCreate) -> Result<RiderId, RiderError> {
        debug!("Sending request");
        self.request(|respond_to| LedgerRequest::RegisterRider { params, respond_to })
            .await
            .map_err(rider_error)?
    }

    pub async fn get_rider(&self, id: RiderId) -> Result<Option<Rider>, RiderError> {
        self.request(|respond_to| LedgerRequest::GetRider { id, respond_to })
            .await
            .map_err(rider_error)
    }

    /// Up to `limit` distinct active riders, uniformly sampled.
    pub async fn list_active_sample(&self, limit: usize) -> Result<Vec<Rider>, RiderError> {
        self.request(|respond_to| LedgerRequest::SampleActive { limit, respond_to })
            .await
            .map_err(rider_error)
    }

    /// Sets a rider on or off shift. Returns whether anything changed.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: RiderId, active: bool) -> Result<bool, RiderError> {
        self.request(|respond_to| LedgerRequest::SetActive {
            id,
            active,
            respond_to,
        })
        .await
        .map_err(rider_error)?
    }

    /// `set_active` for the owning user only; anyone else gets `Forbidden`.
    #[instrument(skip(self))]
    pub async fn toggle_rider_active(
        &self,
        caller: UserId,
        id: RiderId,
        desired: bool,
    ) -> Result<bool, RiderError> {
        self.request(|respond_to| LedgerRequest::ToggleActive {
            caller,
            id,
            active: desired,
            respond_to,
        })
        .await
        .map_err(rider_error)?
    }

    pub async fn report_position(&self, id: RiderId, position: Position) -> Result<(), RiderError> {
        self.request(|respond_to| LedgerRequest::ReportPosition {
            id,
            position,
            respond_to,
        })
        .await
        .map_err(rider_error)?
    }

    // ---- catalog ----

    #[instrument(skip(self))]
    pub async fn register_shop(&self, params: ShopCreate) -> Result<ShopId, CatalogError> {
        debug!("Sending request");
        self.request(|respond_to| LedgerRequest::RegisterShop { params, respond_to })
            .await
            .map_err(catalog_error)?
    }

    pub async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, CatalogError> {
        self.request(|respond_to| LedgerRequest::GetShop { id, respond_to })
            .await
            .map_err(catalog_error)
    }

    #[instrument(skip(self))]
    pub async fn add_dish(&self, params: DishCreate) -> Result<DishId, CatalogError> {
        debug!("Sending request");
        self.request(|respond_to| LedgerRequest::AddDish { params, respond_to })
            .await
            .map_err(catalog_error)?
    }

    pub async fn get_dish(&self, id: DishId) -> Result<Option<Dish>, CatalogError> {
        self.request(|respond_to| LedgerRequest::GetDish { id, respond_to })
            .await
            .map_err(catalog_error)
    }

    pub async fn dish_listing(&self, id: DishId) -> Result<Option<DishListing>, OrderError> {
        self.request(|respond_to| LedgerRequest::Listing { id, respond_to })
            .await
            .map_err(order_error)
    }

    // ---- orders ----

    #[instrument(skip(self, decision, listing), fields(rider_id = %decision.rider_id))]
    pub async fn commit_order(
        &self,
        decision: DispatchDecision,
        listing: DishListing,
        consumer: UserId,
    ) -> Result<CommittedOrder, OrderError> {
        self.request(|respond_to| LedgerRequest::CommitOrder {
            decision,
            listing,
            consumer,
            respond_to,
        })
        .await
        .map_err(order_error)?
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.request(|respond_to| LedgerRequest::GetOrder { id, respond_to })
            .await
            .map_err(order_error)
    }

    /// Newest first.
    pub async fn orders_for_consumer(&self, id: UserId) -> Result<Vec<Order>, OrderError> {
        self.orders_for(OrderParty::Consumer(id)).await
    }

    /// Newest first.
    pub async fn orders_for_rider(&self, id: RiderId) -> Result<Vec<Order>, OrderError> {
        self.orders_for(OrderParty::Rider(id)).await
    }

    async fn orders_for(&self, party: OrderParty) -> Result<Vec<Order>, OrderError> {
        self.request(|respond_to| LedgerRequest::OrdersFor { party, respond_to })
            .await
            .map_err(order_error)
    }

    #[instrument(skip(self))]
    pub async fn complete_delivery(
        &self,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<DeliveryOutcome, OrderError> {
        self.request(|respond_to| LedgerRequest::CompleteDelivery {
            id,
            now,
            respond_to,
        })
        .await
        .map_err(order_error)?
    }
}

fn rider_error(e: FrameworkError) -> RiderError {
    RiderError::ActorCommunicationError(e.to_string())
}

fn catalog_error(e: FrameworkError) -> CatalogError {
    CatalogError::ActorCommunicationError(e.to_string())
}

fn order_error(e: FrameworkError) -> OrderError {
    OrderError::ActorCommunicationError(e.to_string())
}
