//! # Ledger Store
//!
//! The tables that must change together: riders, shops, dishes and orders. A [`Store`] is
//! owned by exactly one [`ledger actor`](crate::ledger_actor), which applies one request at a
//! time, so every read-check-write sequence below runs without interleaving.
//!
//! Multi-row writes go through a [`Transaction`]; see [`commit_order`].

pub mod commit;
pub mod transaction;

pub use commit::*;
pub use transaction::*;

use crate::ledger_actor::{CatalogError, OrderError, RiderError};
use crate::model::{
    Dish, DishCreate, DishId, DishListing, Order, OrderId, Position, Rider, RiderCreate, RiderId,
    Shop, ShopCreate, ShopId, UserId,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Places inside a transaction where a test can force a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
    CreditIncome,
    RecordSale,
}

/// What `complete_delivery` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The order was open and is now finished.
    Delivered(Order),
    AlreadyDelivered,
    /// The trigger fired before the promised time; nothing changed.
    NotDue { due: DateTime<Utc> },
}

/// Which side of an order a listing query is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderParty {
    Consumer(UserId),
    Rider(RiderId),
}

pub struct Store {
    riders: BTreeMap<RiderId, Rider>,
    shops: BTreeMap<ShopId, Shop>,
    dishes: BTreeMap<DishId, Dish>,
    orders: BTreeMap<OrderId, Order>,
    next_rider: u32,
    next_shop: u32,
    next_dish: u32,
    next_order: u32,
    rng: StdRng,
    #[cfg(test)]
    faults: Vec<FaultPoint>,
}

impl Store {
    /// A fixed `seed` makes rider sampling reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            riders: BTreeMap::new(),
            shops: BTreeMap::new(),
            dishes: BTreeMap::new(),
            orders: BTreeMap::new(),
            next_rider: 1,
            next_shop: 1,
            next_dish: 1,
            next_order: 1,
            rng,
            #[cfg(test)]
            faults: Vec::new(),
        }
    }

    pub fn begin(&mut self) -> Transaction<'_> {
        Transaction::new(self)
    }

    // ---- riders ----

    pub fn register_rider(&mut self, params: RiderCreate) -> Result<RiderId, RiderError> {
        let id = RiderId(next_id(&mut self.next_rider).ok_or(RiderError::IdsExhausted)?);
        self.riders
            .insert(id, Rider::new(id, params.user_id, params.position));
        Ok(id)
    }

    pub fn rider(&self, id: RiderId) -> Option<&Rider> {
        self.riders.get(&id)
    }

    /// Returns whether the flag actually changed.
    pub fn set_active(&mut self, id: RiderId, active: bool) -> Result<bool, RiderError> {
        let rider = self.riders.get_mut(&id).ok_or(RiderError::NotFound(id))?;
        let changed = rider.active != active;
        rider.active = active;
        Ok(changed)
    }

    /// Like [`Store::set_active`], but only for the user who owns the rider profile.
    pub fn toggle_active(
        &mut self,
        caller: UserId,
        id: RiderId,
        active: bool,
    ) -> Result<bool, RiderError> {
        let owner = self.riders.get(&id).ok_or(RiderError::NotFound(id))?.user_id;
        if owner != caller {
            return Err(RiderError::Forbidden { caller, rider: id });
        }
        self.set_active(id, active)
    }

    pub fn report_position(&mut self, id: RiderId, position: Position) -> Result<(), RiderError> {
        let rider = self.riders.get_mut(&id).ok_or(RiderError::NotFound(id))?;
        rider.position = position;
        Ok(())
    }

    /// Up to `limit` distinct active riders, chosen uniformly at random.
    pub fn sample_active(&mut self, limit: usize) -> Vec<Rider> {
        self.riders
            .values()
            .filter(|rider| rider.active)
            .cloned()
            .choose_multiple(&mut self.rng, limit)
    }

    // ---- catalog ----

    pub fn register_shop(&mut self, params: ShopCreate) -> Result<ShopId, CatalogError> {
        let id = ShopId(next_id(&mut self.next_shop).ok_or(CatalogError::IdsExhausted("shop"))?);
        self.shops.insert(
            id,
            Shop {
                id,
                owner: params.owner,
                name: params.name,
                position: params.position,
            },
        );
        Ok(id)
    }

    pub fn shop(&self, id: ShopId) -> Option<&Shop> {
        self.shops.get(&id)
    }

    pub fn add_dish(&mut self, params: DishCreate) -> Result<DishId, CatalogError> {
        if params.price == 0 {
            return Err(CatalogError::InvalidPrice);
        }
        if !self.shops.contains_key(&params.shop_id) {
            return Err(CatalogError::ShopNotFound(params.shop_id));
        }
        let id = DishId(next_id(&mut self.next_dish).ok_or(CatalogError::IdsExhausted("dish"))?);
        self.dishes.insert(
            id,
            Dish {
                id,
                shop_id: params.shop_id,
                name: params.name,
                price: params.price,
                sales: 0,
            },
        );
        Ok(id)
    }

    pub fn dish(&self, id: DishId) -> Option<&Dish> {
        self.dishes.get(&id)
    }

    pub fn listing(&self, id: DishId) -> Option<DishListing> {
        let dish = self.dishes.get(&id)?;
        let shop = self.shops.get(&dish.shop_id)?;
        Some(DishListing {
            dish_id: dish.id,
            shop_id: shop.id,
            price: dish.price,
            shop_position: shop.position,
        })
    }

    // ---- orders ----

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Newest first.
    pub fn orders_for(&self, party: OrderParty) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|order| match party {
                OrderParty::Consumer(id) => order.consumer_id == id,
                OrderParty::Rider(id) => order.rider_id == id,
            })
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        orders
    }

    /// Marks the order finished once `now` has reached its promised time. Idempotent.
    pub fn complete_delivery(
        &mut self,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<DeliveryOutcome, OrderError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(OrderError::OrderNotFound(id))?;
        if order.is_finish {
            return Ok(DeliveryOutcome::AlreadyDelivered);
        }
        if now < order.time {
            return Ok(DeliveryOutcome::NotDue { due: order.time });
        }
        order.is_finish = true;
        Ok(DeliveryOutcome::Delivered(order.clone()))
    }

    // ---- fault injection ----

    #[cfg(test)]
    pub(crate) fn inject_fault(&mut self, point: FaultPoint) {
        self.faults.push(point);
    }

    #[cfg(test)]
    fn trip(&mut self, point: FaultPoint) -> Result<(), StorageError> {
        match self.faults.iter().position(|armed| *armed == point) {
            Some(index) => {
                self.faults.remove(index);
                Err(StorageError::Injected(point))
            }
            None => Ok(()),
        }
    }

    #[cfg(not(test))]
    fn trip(&mut self, _point: FaultPoint) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Hands out the counter's value and advances it, or `None` once it cannot advance.
fn next_id(counter: &mut u32) -> Option<u32> {
    let id = *counter;
    *counter = id.checked_add(1)?;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_riders(n: u32, active: bool) -> Store {
        let mut store = Store::new(Some(7));
        for i in 0..n {
            let id = store.register_rider(RiderCreate {
                user_id: UserId(i + 1),
                position: Position::new(i, i),
            })
            .unwrap();
            store.set_active(id, active).unwrap();
        }
        store
    }

    #[test]
    fn test_riders_start_inactive() {
        let mut store = Store::new(Some(1));
        let id = store
            .register_rider(RiderCreate {
                user_id: UserId(1),
                position: Position::new(0, 0),
            })
            .unwrap();

        let rider = store.rider(id).unwrap();
        assert!(!rider.active);
        assert_eq!(rider.income, 0);
        assert!(store.sample_active(10).is_empty());
    }

    #[test]
    fn test_set_active_reports_change() {
        let mut store = store_with_riders(1, false);
        let id = RiderId(1);

        assert!(store.set_active(id, true).unwrap());
        assert!(!store.set_active(id, true).unwrap());
        assert!(store.rider(id).unwrap().active);
        assert!(store.set_active(id, false).unwrap());
        assert_eq!(
            store.set_active(RiderId(9), true),
            Err(RiderError::NotFound(RiderId(9)))
        );
    }

    #[test]
    fn test_only_owner_may_toggle() {
        let mut store = store_with_riders(1, false);

        assert_eq!(
            store.toggle_active(UserId(2), RiderId(1), true),
            Err(RiderError::Forbidden {
                caller: UserId(2),
                rider: RiderId(1)
            })
        );
        assert!(!store.rider(RiderId(1)).unwrap().active);
        assert_eq!(store.toggle_active(UserId(1), RiderId(1), true), Ok(true));
    }

    #[test]
    fn test_sample_is_bounded_and_active_only() {
        let mut store = store_with_riders(150, true);
        for i in (1..=150).step_by(2) {
            store.set_active(RiderId(i), false).unwrap();
        }

        let sample = store.sample_active(100);
        assert_eq!(sample.len(), 75);
        assert!(sample.iter().all(|r| r.active));

        let sample = store.sample_active(10);
        assert_eq!(sample.len(), 10);
        let mut ids: Vec<_> = sample.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let ids = |mut store: Store| -> Vec<RiderId> {
            store.sample_active(5).iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(store_with_riders(40, true)), ids(store_with_riders(40, true)));
    }

    #[test]
    fn test_dish_requires_shop_and_price() {
        let mut store = Store::new(Some(1));
        let shop = store
            .register_shop(ShopCreate {
                owner: UserId(1),
                name: "Noodle Bar".into(),
                position: Position::new(5, 5),
            })
            .unwrap();

        let missing = store.add_dish(DishCreate {
            shop_id: ShopId(42),
            name: "Dumplings".into(),
            price: 8,
        });
        assert_eq!(missing, Err(CatalogError::ShopNotFound(ShopId(42))));

        let free = store.add_dish(DishCreate {
            shop_id: shop,
            name: "Water".into(),
            price: 0,
        });
        assert_eq!(free, Err(CatalogError::InvalidPrice));

        let dish = store
            .add_dish(DishCreate {
                shop_id: shop,
                name: "Dumplings".into(),
                price: 8,
            })
            .unwrap();
        let listing = store.listing(dish).unwrap();
        assert_eq!(listing.price, 8);
        assert_eq!(listing.shop_position, Position::new(5, 5));
        assert!(store.listing(DishId(99)).is_none());
    }

    #[test]
    fn test_id_counters_stop_instead_of_wrapping() {
        let mut store = Store::new(Some(1));
        store.next_rider = u32::MAX;
        store.next_shop = u32::MAX;

        let rider = RiderCreate {
            user_id: UserId(1),
            position: Position::new(0, 0),
        };
        assert_eq!(store.register_rider(rider.clone()), Err(RiderError::IdsExhausted));
        assert_eq!(store.next_rider, u32::MAX);
        assert!(store.rider(RiderId(u32::MAX)).is_none());

        let shop = ShopCreate {
            owner: UserId(1),
            name: "Noodle Bar".into(),
            position: Position::new(5, 5),
        };
        assert_eq!(store.register_shop(shop), Err(CatalogError::IdsExhausted("shop")));

        store.next_shop = 1;
        let shop = store
            .register_shop(ShopCreate {
                owner: UserId(1),
                name: "Noodle Bar".into(),
                position: Position::new(5, 5),
            })
            .unwrap();
        store.next_dish = u32::MAX;
        let dish = store.add_dish(DishCreate {
            shop_id: shop,
            name: "Dumplings".into(),
            price: 8,
        });
        assert_eq!(dish, Err(CatalogError::IdsExhausted("dish")));
    }

    #[test]
    fn test_unknown_order_cannot_be_delivered() {
        let mut store = Store::new(Some(1));
        assert_eq!(
            store.complete_delivery(OrderId(3), Utc::now()),
            Err(OrderError::OrderNotFound(OrderId(3)))
        );
    }
}
