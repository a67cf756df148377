use chrono::TimeDelta;
use rider_dispatch::clients::NotificationClient;
use rider_dispatch::consumer_actor::ConsumerError;
use rider_dispatch::framework::ActorClient;
use rider_dispatch::ledger::DeliveryOutcome;
use rider_dispatch::ledger_actor::{OrderError, RiderError};
use rider_dispatch::lifecycle::{DispatchConfig, DispatchSystem};
use rider_dispatch::model::{
    ConsumerCreate, ConsumerUpdate, DishCreate, DishId, Notification, NotificationKind, PlaceOrder, Position,
    RiderCreate, RiderId, ShopCreate, ShopId, UserId,
};
use std::time::Duration;

struct Market {
    system: DispatchSystem,
    consumer: UserId,
    owner: UserId,
    shop: ShopId,
    dish: DishId,
    near: (UserId, RiderId),
    far: (UserId, RiderId),
}

async fn user(system: &DispatchSystem, name: &str, position: Position) -> UserId {
    system
        .consumer_client
        .create_consumer(ConsumerCreate {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            position,
        })
        .await
        .unwrap()
}

async fn rider(system: &DispatchSystem, name: &str, position: Position) -> (UserId, RiderId) {
    let user_id = user(system, name, position).await;
    let rider_id = system
        .ledger_client
        .register_rider(RiderCreate { user_id, position })
        .await
        .unwrap();
    (user_id, rider_id)
}

/// Riders at (0,0) and (10,10), a confirmed consumer at (1,1), and a 20-unit dish at a
/// shop on (5,5). Riders start off shift.
async fn market() -> Market {
    let system = DispatchSystem::new(&DispatchConfig {
        sample_seed: Some(11),
        ..DispatchConfig::default()
    });

    let consumer = user(&system, "mei", Position::new(1, 1)).await;
    assert!(system.consumer_client.confirm(consumer).await.unwrap());

    let owner = user(&system, "owner", Position::new(5, 5)).await;
    let shop = system
        .ledger_client
        .register_shop(ShopCreate {
            owner,
            name: "Noodle Bar".into(),
            position: Position::new(5, 5),
        })
        .await
        .unwrap();
    let dish = system
        .ledger_client
        .add_dish(DishCreate {
            shop_id: shop,
            name: "Beef noodles".into(),
            price: 20,
        })
        .await
        .unwrap();

    let near = rider(&system, "ana", Position::new(0, 0)).await;
    let far = rider(&system, "ravi", Position::new(10, 10)).await;

    Market {
        system,
        consumer,
        owner,
        shop,
        dish,
        near,
        far,
    }
}

async fn go_on_shift(system: &DispatchSystem, (user_id, rider_id): (UserId, RiderId)) {
    system
        .ledger_client
        .toggle_rider_active(user_id, rider_id, true)
        .await
        .unwrap();
}

fn buy(consumer: UserId, dish: DishId, quantity: i64) -> PlaceOrder {
    PlaceOrder {
        consumer_id: consumer,
        dish_id: dish,
        quantity,
        consumer_position: None,
    }
}

async fn inbox(client: &NotificationClient, user: UserId, expected: usize) -> Vec<Notification> {
    for _ in 0..100 {
        let inbox = client.for_receiver(user).await.unwrap();
        if inbox.len() >= expected {
            return inbox;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{user} never received {expected} notifications");
}

#[tokio::test]
async fn test_nearest_rider_gets_the_order() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;
    go_on_shift(&m.system, m.far).await;

    let placement = m
        .system
        .order_client
        .place(buy(m.consumer, m.dish, 2))
        .await
        .unwrap();
    assert_eq!(placement.notifications.len(), 2);
    for notification in placement.notifications {
        notification.await.unwrap();
    }
    let receipt = placement.receipt;

    assert_eq!(receipt.rider_id, m.near.1);
    assert_eq!(receipt.fare, 10);
    assert_eq!(receipt.price, 50);

    let order = m.system.order_client.get_order(receipt.order_id).await.unwrap().unwrap();
    assert_eq!(order.time - order.start_time, TimeDelta::seconds(2));
    assert_eq!(order.number, 2);
    assert!(!order.is_finish);

    let near = m.system.ledger_client.get_rider(m.near.1).await.unwrap().unwrap();
    let far = m.system.ledger_client.get_rider(m.far.1).await.unwrap().unwrap();
    assert_eq!(near.income, 10);
    assert_eq!(far.income, 0);
    let dish = m.system.ledger_client.get_dish(m.dish).await.unwrap().unwrap();
    assert_eq!(dish.sales, 1);

    // Both notification tasks have finished, so the inboxes are already filled.
    let notifications = &m.system.notification_client;
    let rider_inbox = notifications.for_receiver(m.near.0).await.unwrap();
    assert_eq!(rider_inbox.len(), 1);
    assert_eq!(rider_inbox[0].kind, NotificationKind::OrderPlaced);
    assert!(rider_inbox[0]
        .message
        .starts_with(&format!("You have a new order {}!", receipt.order_id)));
    let owner_inbox = notifications.for_receiver(m.owner).await.unwrap();
    assert_eq!(owner_inbox.len(), 1);
    assert_eq!(owner_inbox[0].order_id, receipt.order_id);
    assert!(notifications.for_receiver(m.far.0).await.unwrap().is_empty());

    assert_eq!(
        m.system.order_client.orders_for_consumer(m.consumer).await.unwrap(),
        vec![order.clone()]
    );
    assert_eq!(
        m.system.ledger_client.orders_for_rider(m.near.1).await.unwrap(),
        vec![order]
    );
    assert!(m.system.ledger_client.orders_for_rider(m.far.1).await.unwrap().is_empty());

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delivery_position_overrides_stored_location() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;
    go_on_shift(&m.system, m.far).await;

    let receipt = m
        .system
        .order_client
        .place_order(PlaceOrder {
            consumer_position: Some(Position::new(9, 9)),
            ..buy(m.consumer, m.dish, 1)
        })
        .await
        .unwrap();

    assert_eq!(receipt.rider_id, m.far.1);
    assert_eq!(receipt.fare, 2 + 8);
    assert_eq!(receipt.price, 20 + 10);

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_moved_consumer_is_dispatched_from_new_location() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;
    go_on_shift(&m.system, m.far).await;
    let consumers = &m.system.consumer_client;

    let moved = consumers
        .update_consumer(
            m.consumer,
            ConsumerUpdate {
                position: Some(Position::new(9, 9)),
                ..ConsumerUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.position, Position::new(9, 9));
    assert!(moved.confirmed);

    let rejected = consumers
        .update_consumer(
            m.consumer,
            ConsumerUpdate {
                email: Some("nowhere".into()),
                position: Some(Position::new(0, 0)),
                ..ConsumerUpdate::default()
            },
        )
        .await;
    assert!(matches!(rejected, Err(ConsumerError::ValidationError(_))));
    let stored = consumers.get(m.consumer).await.unwrap().unwrap();
    assert_eq!(stored.email, "mei@example.com");
    assert_eq!(stored.position, Position::new(9, 9));

    assert!(matches!(
        consumers.update_consumer(UserId(404), ConsumerUpdate::default()).await,
        Err(ConsumerError::NotFound(_))
    ));

    // No position on the request: the stored (9,9) is used.
    let receipt = m
        .system
        .order_client
        .place_order(buy(m.consumer, m.dish, 1))
        .await
        .unwrap();
    assert_eq!(receipt.rider_id, m.far.1);
    assert_eq!(receipt.fare, 2 + 8);

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shop_lookup() {
    let m = market().await;
    let ledger = &m.system.ledger_client;

    let shop = ledger.get_shop(m.shop).await.unwrap().unwrap();
    assert_eq!(shop.owner, m.owner);
    assert_eq!(shop.name, "Noodle Bar");
    assert_eq!(shop.position, Position::new(5, 5));
    assert!(ledger.get_shop(ShopId(404)).await.unwrap().is_none());

    let listing = ledger.dish_listing(m.dish).await.unwrap().unwrap();
    assert_eq!(listing.shop_id, shop.id);

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_pool_changes_nothing() {
    let m = market().await;

    let result = m.system.order_client.place_order(buy(m.consumer, m.dish, 1)).await;

    assert_eq!(result, Err(OrderError::NoRiderAvailable));
    assert!(m.system.order_client.orders_for_consumer(m.consumer).await.unwrap().is_empty());
    let dish = m.system.ledger_client.get_dish(m.dish).await.unwrap().unwrap();
    assert_eq!(dish.sales, 0);

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_bad_quantities_change_nothing() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;

    for quantity in [0, -3] {
        let result = m
            .system
            .order_client
            .place_order(buy(m.consumer, m.dish, quantity))
            .await;
        assert_eq!(result, Err(OrderError::InvalidQuantity(quantity)));
    }

    assert!(m.system.order_client.orders_for_consumer(m.consumer).await.unwrap().is_empty());
    let near = m.system.ledger_client.get_rider(m.near.1).await.unwrap().unwrap();
    assert_eq!(near.income, 0);

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_only_confirmed_known_consumers_can_buy() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;
    let stranger = user(&m.system, "lee", Position::new(2, 2)).await;

    assert_eq!(
        m.system.order_client.place_order(buy(stranger, m.dish, 1)).await,
        Err(OrderError::ConsumerNotConfirmed(stranger))
    );
    assert_eq!(
        m.system.order_client.place_order(buy(UserId(404), m.dish, 1)).await,
        Err(OrderError::ConsumerNotFound(UserId(404)))
    );
    assert_eq!(
        m.system.order_client.place_order(buy(m.consumer, DishId(404), 1)).await,
        Err(OrderError::DishNotFound(DishId(404)))
    );

    let consumer = m.system.consumer_client.get(m.consumer).await.unwrap().unwrap();
    assert!(consumer.confirmed);
    assert!(!m.system.consumer_client.confirm(m.consumer).await.unwrap());

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delivery_completes_once_and_notifies_consumer() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;
    let receipt = m
        .system
        .order_client
        .place_order(buy(m.consumer, m.dish, 1))
        .await
        .unwrap();
    let orders = &m.system.order_client;

    let early = orders
        .complete_delivery(receipt.order_id, receipt.time - TimeDelta::seconds(1))
        .await
        .unwrap();
    assert_eq!(early, DeliveryOutcome::NotDue { due: receipt.time });

    let done = orders.complete_delivery(receipt.order_id, receipt.time).await.unwrap();
    assert!(matches!(done, DeliveryOutcome::Delivered(ref order) if order.is_finish));

    let again = orders
        .complete_delivery(receipt.order_id, receipt.time + TimeDelta::seconds(60))
        .await
        .unwrap();
    assert_eq!(again, DeliveryOutcome::AlreadyDelivered);

    let consumer_inbox = inbox(&m.system.notification_client, m.consumer, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let consumer_inbox_later = inbox(&m.system.notification_client, m.consumer, 1).await;
    assert_eq!(consumer_inbox.len(), 1);
    assert_eq!(consumer_inbox_later.len(), 1);
    assert_eq!(consumer_inbox[0].kind, NotificationKind::OrderDelivered);
    assert_eq!(consumer_inbox[0].timestamp, receipt.time);
    assert!(consumer_inbox[0]
        .message
        .starts_with(&format!("Your order {} has been delivered!", receipt.order_id)));

    assert_eq!(
        orders.complete_delivery(rider_dispatch::model::OrderId(77), receipt.time).await,
        Err(OrderError::OrderNotFound(rider_dispatch::model::OrderId(77)))
    );

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rider_toggle_is_owner_only_and_idempotent() {
    let m = market().await;
    let (ana, ana_rider) = m.near;
    let (ravi, _) = m.far;
    let ledger = &m.system.ledger_client;

    assert_eq!(
        ledger.toggle_rider_active(ravi, ana_rider, true).await,
        Err(RiderError::Forbidden {
            caller: ravi,
            rider: ana_rider
        })
    );
    assert!(!ledger.get_rider(ana_rider).await.unwrap().unwrap().active);

    assert_eq!(ledger.toggle_rider_active(ana, ana_rider, true).await, Ok(true));
    assert_eq!(ledger.toggle_rider_active(ana, ana_rider, true).await, Ok(false));
    assert_eq!(ledger.set_active(ana_rider, false).await, Ok(true));
    assert_eq!(ledger.set_active(ana_rider, false).await, Ok(false));
    assert_eq!(
        ledger.set_active(RiderId(99), true).await,
        Err(RiderError::NotFound(RiderId(99)))
    );

    ledger.report_position(ana_rider, Position::new(4, 4)).await.unwrap();
    assert_eq!(
        ledger.get_rider(ana_rider).await.unwrap().unwrap().position,
        Position::new(4, 4)
    );

    m.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_inboxes_list_newest_first() {
    let m = market().await;
    go_on_shift(&m.system, m.near).await;

    let first = m
        .system
        .order_client
        .place_order(buy(m.consumer, m.dish, 1))
        .await
        .unwrap();
    // Keep the two start times apart.
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = m
        .system
        .order_client
        .place_order(buy(m.consumer, m.dish, 3))
        .await
        .unwrap();

    let rider_inbox = inbox(&m.system.notification_client, m.near.0, 2).await;
    assert_eq!(rider_inbox[0].order_id, second.order_id);
    assert_eq!(rider_inbox[1].order_id, first.order_id);

    let orders = m.system.order_client.orders_for_consumer(m.consumer).await.unwrap();
    assert_eq!(orders[0].id, second.order_id);
    assert_eq!(orders[1].id, first.order_id);

    let near = m.system.ledger_client.get_rider(m.near.1).await.unwrap().unwrap();
    assert_eq!(near.income, first.fare + second.fare);

    m.system.shutdown().await.unwrap();
}
