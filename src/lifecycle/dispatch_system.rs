use super::config::DispatchConfig;
use crate::clients::{ConsumerClient, LedgerClient, NotificationClient, NotificationSink, OrderClient};
use crate::dispatch::{CandidateSelector, Dispatcher, RandomSampleSelector};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Starts, wires and stops every actor.
///
/// Three actors run, each on its own task:
/// - **Ledger**: riders, shops, dishes and orders, with transactional commits
/// - **Consumer**: accounts and confirmation
/// - **Notification**: append-only inboxes
///
/// The order flow is not an actor: [`OrderClient`] drives the others and can be cloned into
/// as many tasks as there are concurrent buyers.
///
/// ```rust,no_run
/// use rider_dispatch::lifecycle::{DispatchConfig, DispatchSystem};
///
/// #[tokio::main]
/// async fn main() {
///     let system = DispatchSystem::new(&DispatchConfig::default());
///     // system.order_client.place_order(...).await
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct DispatchSystem {
    pub order_client: OrderClient,
    pub ledger_client: LedgerClient,
    pub consumer_client: ConsumerClient,
    pub notification_client: NotificationClient,

    /// Actor tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl DispatchSystem {
    /// Boots the system with the random-sample candidate selector.
    pub fn new(config: &DispatchConfig) -> Self {
        let limit = config.sample_limit;
        Self::with_selector(config, move |ledger| RandomSampleSelector::new(ledger, limit))
    }

    /// Boots the system with a custom candidate source built from the ledger client.
    pub fn with_selector<S, F>(config: &DispatchConfig, make_selector: F) -> Self
    where
        S: CandidateSelector + 'static,
        F: FnOnce(LedgerClient) -> S,
    {
        let (ledger_actor, ledger_client) =
            crate::ledger_actor::new(config.channel_buffer, config.sample_seed);
        let (consumer_actor, consumer_client) = crate::consumer_actor::new(config.channel_buffer);
        let (notification_actor, notification_client) =
            crate::notification_actor::new(config.channel_buffer);

        let handles = vec![
            tokio::spawn(ledger_actor.run()),
            tokio::spawn(consumer_actor.run(())),
            tokio::spawn(notification_actor.run(())),
        ];

        let notifier: Arc<dyn NotificationSink> = Arc::new(notification_client.clone());
        let order_client = OrderClient::new(
            ledger_client.clone(),
            consumer_client.clone(),
            Dispatcher::new(make_selector(ledger_client.clone())),
            notifier,
            config.max_attempts,
        );
        info!(?config, "Dispatch system started");

        Self {
            order_client,
            ledger_client,
            consumer_client,
            notification_client,
            handles,
        }
    }

    /// Drops every client and waits for the actors to drain their mailboxes.
    ///
    /// Clones handed out earlier (for example to delivery timers) keep their actor alive
    /// until they are dropped too.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.ledger_client);
        drop(self.consumer_client);
        drop(self.notification_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
