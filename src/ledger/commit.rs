//! Committing a dispatch decision.

use super::{OrderDraft, StorageError, Transaction};
use crate::dispatch::DispatchDecision;
use crate::ledger_actor::OrderError;
use crate::model::{DishListing, Order, UserId};
use chrono::{DateTime, TimeDelta, Utc};

/// A committed order, with the users to notify about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedOrder {
    pub order: Order,
    pub rider_user: UserId,
    pub shop_owner: UserId,
}

impl From<StorageError> for OrderError {
    fn from(e: StorageError) -> Self {
        OrderError::StorageFailure(e.to_string())
    }
}

/// Re-validates `decision` against current state and writes the order, the rider's income
/// and the dish's sales count.
///
/// On error some of those writes may already be in `tx`; dropping it undoes them.
pub fn commit_order(
    tx: &mut Transaction<'_>,
    decision: &DispatchDecision,
    listing: &DishListing,
    consumer: UserId,
    now: DateTime<Utc>,
) -> Result<CommittedOrder, OrderError> {
    if decision.quantity == 0 {
        return Err(OrderError::InvalidQuantity(0));
    }

    let store = tx.store();
    let rider_user = match store.rider(decision.rider_id) {
        Some(rider) if rider.active => rider.user_id,
        _ => return Err(OrderError::RiderNoLongerAvailable(decision.rider_id)),
    };

    let dish = store
        .dish(listing.dish_id)
        .ok_or(OrderError::DishNotFound(listing.dish_id))?;
    let shop = store
        .shop(dish.shop_id)
        .ok_or_else(|| StorageError::MissingRow(dish.shop_id.to_string()))?;
    if dish.price != listing.price
        || dish.shop_id != listing.shop_id
        || shop.position != listing.shop_position
    {
        return Err(OrderError::StorageFailure(format!(
            "{} changed since dispatch",
            dish.id
        )));
    }
    let shop_owner = shop.owner;

    let expected = listing
        .price
        .checked_mul(u64::from(decision.quantity))
        .and_then(|goods| goods.checked_add(decision.fare));
    if expected != Some(decision.total_price) {
        return Err(OrderError::StorageFailure(
            "total does not match dish price and fare".into(),
        ));
    }

    let time = i64::try_from(decision.eta.as_secs())
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|eta| now.checked_add_signed(eta))
        .ok_or(StorageError::Overflow("delivery time"))?;

    let order = tx.insert_order(OrderDraft {
        dish_id: listing.dish_id,
        shop_id: listing.shop_id,
        consumer_id: consumer,
        rider_id: decision.rider_id,
        price: decision.total_price,
        fare: decision.fare,
        number: decision.quantity,
        start_time: now,
        time,
    })?;
    tx.credit_income(decision.rider_id, decision.fare)?;
    tx.record_sale(listing.dish_id)?;

    Ok(CommittedOrder {
        order,
        rider_user,
        shop_owner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{DeliveryOutcome, FaultPoint, Store};
    use crate::model::{DishCreate, Position, RiderCreate, RiderId, ShopCreate};
    use std::time::Duration;

    struct Fixture {
        store: Store,
        listing: DishListing,
        rider: RiderId,
    }

    // Scenario: rider at (0,0), consumer at (1,1), shop at (5,5), price 20, quantity 2.
    fn fixture() -> Fixture {
        let mut store = Store::new(Some(3));
        let rider = store
            .register_rider(RiderCreate {
                user_id: UserId(10),
                position: Position::new(0, 0),
            })
            .unwrap();
        store.set_active(rider, true).unwrap();
        let shop = store
            .register_shop(ShopCreate {
                owner: UserId(20),
                name: "Noodle Bar".into(),
                position: Position::new(5, 5),
            })
            .unwrap();
        let dish = store
            .add_dish(DishCreate {
                shop_id: shop,
                name: "Beef noodles".into(),
                price: 20,
            })
            .unwrap();
        let listing = store.listing(dish).unwrap();
        Fixture {
            store,
            listing,
            rider,
        }
    }

    fn decision(rider: RiderId) -> DispatchDecision {
        DispatchDecision {
            rider_id: rider,
            distance: 2,
            fare: 10,
            total_price: 50,
            eta: Duration::from_secs(2),
            quantity: 2,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn assert_untouched(store: &Store, listing: &DishListing, rider: RiderId) {
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.rider(rider).unwrap().income, 0);
        assert_eq!(store.dish(listing.dish_id).unwrap().sales, 0);
    }

    #[test]
    fn test_commit_writes_order_income_and_sales() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();

        let mut tx = store.begin();
        let committed = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now()).unwrap();
        tx.commit();

        let order = &committed.order;
        assert_eq!(order.price, 50);
        assert_eq!(order.fare, 10);
        assert_eq!(order.number, 2);
        assert_eq!(order.time - order.start_time, TimeDelta::seconds(2));
        assert!(!order.is_finish);
        assert_eq!(committed.rider_user, UserId(10));
        assert_eq!(committed.shop_owner, UserId(20));

        assert_eq!(store.order(order.id), Some(order));
        assert_eq!(store.rider(rider).unwrap().income, 10);
        assert_eq!(store.dish(listing.dish_id).unwrap().sales, 1);
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();

        {
            let mut tx = store.begin();
            commit_order(&mut tx, &decision(rider), &listing, UserId(30), now()).unwrap();
        }

        assert_untouched(&store, &listing, rider);

        // The rolled-back order id is handed out again.
        let mut tx = store.begin();
        let committed = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now()).unwrap();
        tx.commit();
        assert_eq!(committed.order.id.0, 1);
    }

    #[test]
    fn test_inactive_rider_is_rejected() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();
        store.set_active(rider, false).unwrap();

        let mut tx = store.begin();
        let result = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now());
        drop(tx);

        assert_eq!(result, Err(OrderError::RiderNoLongerAvailable(rider)));
        assert!(result.unwrap_err().is_retryable());
        assert_untouched(&store, &listing, rider);
    }

    #[test]
    fn test_income_overflow_leaves_nothing_behind() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();
        store.riders.get_mut(&rider).unwrap().income = u64::MAX - 5;

        let mut tx = store.begin();
        let result = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now());
        drop(tx);

        assert!(matches!(result, Err(OrderError::StorageFailure(_))));
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.rider(rider).unwrap().income, u64::MAX - 5);
        assert_eq!(store.dish(listing.dish_id).unwrap().sales, 0);
    }

    #[test]
    fn test_fault_before_income_credit_rolls_back_order() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();
        store.inject_fault(FaultPoint::CreditIncome);

        let mut tx = store.begin();
        let result = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now());
        drop(tx);

        assert!(matches!(result, Err(OrderError::StorageFailure(_))));
        assert_untouched(&store, &listing, rider);

        // The fault fires once; the retry goes through with the same order id.
        let mut tx = store.begin();
        let committed = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now()).unwrap();
        tx.commit();
        assert_eq!(committed.order.id.0, 1);
        assert_eq!(store.rider(rider).unwrap().income, 10);
    }

    #[test]
    fn test_fault_after_income_credit_rolls_back_income() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();
        store.inject_fault(FaultPoint::RecordSale);

        let mut tx = store.begin();
        let result = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now());
        drop(tx);

        assert!(matches!(result, Err(OrderError::StorageFailure(_))));
        assert_untouched(&store, &listing, rider);
    }

    #[test]
    fn test_stale_listing_is_rejected() {
        let Fixture {
            mut store,
            mut listing,
            rider,
        } = fixture();
        listing.price = 15;

        let mut tx = store.begin();
        let result = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now());
        drop(tx);

        assert!(matches!(result, Err(OrderError::StorageFailure(_))));
        assert_untouched(&store, &listing, rider);
    }

    #[test]
    fn test_delivery_completes_once() {
        let Fixture {
            mut store,
            listing,
            rider,
        } = fixture();
        let mut tx = store.begin();
        let order = commit_order(&mut tx, &decision(rider), &listing, UserId(30), now())
            .unwrap()
            .order;
        tx.commit();

        assert_eq!(
            store.complete_delivery(order.id, now()),
            Ok(DeliveryOutcome::NotDue { due: order.time })
        );
        assert!(matches!(
            store.complete_delivery(order.id, order.time),
            Ok(DeliveryOutcome::Delivered(ref done)) if done.is_finish
        ));
        assert_eq!(
            store.complete_delivery(order.id, order.time),
            Ok(DeliveryOutcome::AlreadyDelivered)
        );
        assert!(store.order(order.id).unwrap().is_finish);
    }
}
