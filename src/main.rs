//! Demo: a small marketplace, one purchase, one delivery.

use rider_dispatch::framework::ActorClient;
use rider_dispatch::lifecycle::{schedule_delivery, setup_tracing, DispatchConfig, DispatchSystem};
use rider_dispatch::model::{
    ConsumerCreate, DishCreate, PlaceOrder, Position, RiderCreate, ShopCreate, UserId,
};
use std::collections::BTreeSet;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let _ = dotenvy::dotenv();
    setup_tracing();

    let config = DispatchConfig::from_env().map_err(|e| e.to_string())?;
    let system = DispatchSystem::new(&config);

    let (consumer_id, dish_id) = async {
        let consumer_id = system
            .consumer_client
            .create_consumer(ConsumerCreate {
                name: "Mei".to_string(),
                email: "mei@example.com".to_string(),
                position: Position::new(1, 1),
            })
            .await
            .map_err(|e| e.to_string())?;
        system
            .consumer_client
            .confirm(consumer_id)
            .await
            .map_err(|e| e.to_string())?;

        let owner_id = system
            .consumer_client
            .create_consumer(ConsumerCreate {
                name: "Noodle Bar".to_string(),
                email: "owner@noodlebar.example".to_string(),
                position: Position::new(5, 5),
            })
            .await
            .map_err(|e| e.to_string())?;
        let shop_id = system
            .ledger_client
            .register_shop(ShopCreate {
                owner: owner_id,
                name: "Noodle Bar".to_string(),
                position: Position::new(5, 5),
            })
            .await
            .map_err(|e| e.to_string())?;
        let dish_id = system
            .ledger_client
            .add_dish(DishCreate {
                shop_id,
                name: "Beef noodles".to_string(),
                price: 20,
            })
            .await
            .map_err(|e| e.to_string())?;

        for (name, position) in [("Ana", Position::new(0, 0)), ("Ravi", Position::new(10, 10))] {
            let user_id = system
                .consumer_client
                .create_consumer(ConsumerCreate {
                    name: name.to_string(),
                    email: format!("{}@riders.example", name.to_lowercase()),
                    position,
                })
                .await
                .map_err(|e| e.to_string())?;
            let rider_id = system
                .ledger_client
                .register_rider(RiderCreate { user_id, position })
                .await
                .map_err(|e| e.to_string())?;
            system
                .ledger_client
                .toggle_rider_active(user_id, rider_id, true)
                .await
                .map_err(|e| e.to_string())?;
        }

        info!(%consumer_id, %dish_id, "Marketplace seeded");
        Ok::<_, String>((consumer_id, dish_id))
    }
    .instrument(tracing::info_span!("seeding"))
    .await?;

    let placement = system
        .order_client
        .place(PlaceOrder {
            consumer_id,
            dish_id,
            quantity: 2,
            consumer_position: None,
        })
        .instrument(tracing::info_span!("purchase"))
        .await
        .map_err(|e| e.to_string())?;
    let receipt = placement.receipt;
    info!(
        order_id = %receipt.order_id,
        rider_id = %receipt.rider_id,
        price = receipt.price,
        fare = receipt.fare,
        due = %receipt.time,
        "Order placed"
    );

    let order = system
        .order_client
        .get_order(receipt.order_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{} vanished", receipt.order_id))?;
    schedule_delivery(system.order_client.clone(), &order)
        .await
        .map_err(|e| e.to_string())?;
    for notification in placement.notifications {
        notification.await.map_err(|e| e.to_string())?;
    }

    let receivers: BTreeSet<UserId> = system
        .notification_client
        .list()
        .await
        .map_err(|e| e.to_string())?
        .iter()
        .map(|n| n.receiver)
        .collect();
    for inbox in receivers {
        let notifications = system
            .notification_client
            .for_receiver(inbox)
            .await
            .map_err(|e| e.to_string())?;
        for notification in notifications {
            println!("{inbox}: {}", notification.message);
        }
    }

    system.shutdown().await.map_err(|e| e.to_string())
}
