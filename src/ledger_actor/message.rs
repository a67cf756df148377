//! Requests understood by the ledger actor. Each carries its own reply channel.

use super::{CatalogError, OrderError, RiderError};
use crate::dispatch::DispatchDecision;
use crate::ledger::{CommittedOrder, DeliveryOutcome, OrderParty};
use crate::model::{
    Dish, DishCreate, DishId, DishListing, Order, OrderId, Position, Rider, RiderCreate, RiderId,
    Shop, ShopCreate, ShopId, UserId,
};
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum LedgerRequest {
    RegisterRider {
        params: RiderCreate,
        respond_to: oneshot::Sender<Result<RiderId, RiderError>>,
    },
    GetRider {
        id: RiderId,
        respond_to: oneshot::Sender<Option<Rider>>,
    },
    SetActive {
        id: RiderId,
        active: bool,
        respond_to: oneshot::Sender<Result<bool, RiderError>>,
    },
    /// `SetActive` on behalf of `caller`, who must own the rider.
    ToggleActive {
        caller: UserId,
        id: RiderId,
        active: bool,
        respond_to: oneshot::Sender<Result<bool, RiderError>>,
    },
    ReportPosition {
        id: RiderId,
        position: Position,
        respond_to: oneshot::Sender<Result<(), RiderError>>,
    },
    SampleActive {
        limit: usize,
        respond_to: oneshot::Sender<Vec<Rider>>,
    },
    RegisterShop {
        params: ShopCreate,
        respond_to: oneshot::Sender<Result<ShopId, CatalogError>>,
    },
    GetShop {
        id: ShopId,
        respond_to: oneshot::Sender<Option<Shop>>,
    },
    AddDish {
        params: DishCreate,
        respond_to: oneshot::Sender<Result<DishId, CatalogError>>,
    },
    GetDish {
        id: DishId,
        respond_to: oneshot::Sender<Option<Dish>>,
    },
    Listing {
        id: DishId,
        respond_to: oneshot::Sender<Option<DishListing>>,
    },
    CommitOrder {
        decision: DispatchDecision,
        listing: DishListing,
        consumer: UserId,
        respond_to: oneshot::Sender<Result<CommittedOrder, OrderError>>,
    },
    GetOrder {
        id: OrderId,
        respond_to: oneshot::Sender<Option<Order>>,
    },
    OrdersFor {
        party: OrderParty,
        respond_to: oneshot::Sender<Vec<Order>>,
    },
    CompleteDelivery {
        id: OrderId,
        now: DateTime<Utc>,
        respond_to: oneshot::Sender<Result<DeliveryOutcome, OrderError>>,
    },
}
