//! Undo-log transactions over a [`Store`].
//!
//! Every write is applied to the store immediately and its inverse pushed onto the log. A
//! transaction that is dropped without [`Transaction::commit`] replays the log backwards, so
//! after any failure the store is exactly as it was when [`Store::begin`] was called.

use super::{FaultPoint, Store};
use crate::model::{DishId, Order, OrderId, RiderId, ShopId, UserId};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

/// Failures inside a transaction. The transaction rolls back when one occurs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("missing row: {0}")]
    MissingRow(String),

    #[error("{0} overflowed")]
    Overflow(&'static str),

    /// Raised only by faults armed with `Store::inject_fault`.
    #[error("injected fault at {0:?}")]
    Injected(FaultPoint),
}

/// An order before it has an id.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub dish_id: DishId,
    pub shop_id: ShopId,
    pub consumer_id: UserId,
    pub rider_id: RiderId,
    pub price: u64,
    pub fare: u64,
    pub number: u32,
    pub start_time: DateTime<Utc>,
    pub time: DateTime<Utc>,
}

#[derive(Debug)]
enum Undo {
    Order { id: OrderId, next_order: u32 },
    Income { rider: RiderId, previous: u64 },
    Sales { dish: DishId, previous: u64 },
}

pub struct Transaction<'s> {
    store: &'s mut Store,
    undo: Vec<Undo>,
    committed: bool,
}

impl<'s> Transaction<'s> {
    pub(super) fn new(store: &'s mut Store) -> Self {
        Self {
            store,
            undo: Vec::new(),
            committed: false,
        }
    }

    /// Read access to the store as this transaction currently sees it.
    pub fn store(&self) -> &Store {
        &*self.store
    }

    pub fn insert_order(&mut self, draft: OrderDraft) -> Result<Order, StorageError> {
        let next_order = self.store.next_order;
        let id = OrderId(next_order);
        self.store.next_order = next_order
            .checked_add(1)
            .ok_or(StorageError::Overflow("order id"))?;

        let order = Order {
            id,
            dish_id: draft.dish_id,
            shop_id: draft.shop_id,
            consumer_id: draft.consumer_id,
            rider_id: draft.rider_id,
            price: draft.price,
            fare: draft.fare,
            number: draft.number,
            start_time: draft.start_time,
            time: draft.time,
            is_finish: false,
        };
        self.store.orders.insert(id, order.clone());
        self.undo.push(Undo::Order { id, next_order });
        Ok(order)
    }

    /// Adds `fare` to the rider's income and returns the new total.
    pub fn credit_income(&mut self, rider_id: RiderId, fare: u64) -> Result<u64, StorageError> {
        self.store.trip(FaultPoint::CreditIncome)?;
        let rider = self
            .store
            .riders
            .get_mut(&rider_id)
            .ok_or_else(|| StorageError::MissingRow(rider_id.to_string()))?;
        let previous = rider.income;
        rider.income = previous
            .checked_add(fare)
            .ok_or(StorageError::Overflow("rider income"))?;
        let income = rider.income;
        self.undo.push(Undo::Income {
            rider: rider_id,
            previous,
        });
        Ok(income)
    }

    /// Counts one more order against the dish and returns the new count.
    pub fn record_sale(&mut self, dish_id: DishId) -> Result<u64, StorageError> {
        self.store.trip(FaultPoint::RecordSale)?;
        let dish = self
            .store
            .dishes
            .get_mut(&dish_id)
            .ok_or_else(|| StorageError::MissingRow(dish_id.to_string()))?;
        let previous = dish.sales;
        dish.sales = previous
            .checked_add(1)
            .ok_or(StorageError::Overflow("dish sales"))?;
        let sales = dish.sales;
        self.undo.push(Undo::Sales {
            dish: dish_id,
            previous,
        });
        Ok(sales)
    }

    /// Keeps every write made so far.
    pub fn commit(mut self) {
        self.committed = true;
        self.undo.clear();
    }

    fn rollback(&mut self) {
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::Order { id, next_order } => {
                    self.store.orders.remove(&id);
                    self.store.next_order = next_order;
                }
                Undo::Income { rider, previous } => {
                    if let Some(rider) = self.store.riders.get_mut(&rider) {
                        rider.income = previous;
                    }
                }
                Undo::Sales { dish, previous } => {
                    if let Some(dish) = self.store.dishes.get_mut(&dish) {
                        dish.sales = previous;
                    }
                }
            }
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.undo.is_empty() {
            debug!(steps = self.undo.len(), "Rolling back");
            self.rollback();
        }
    }
}
