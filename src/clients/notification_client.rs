use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Notification, NotificationCreate, NotificationId, NotificationKind, Order, UserId};
use crate::notification_actor::NotificationError;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Somewhere to send order notifications without waiting on the result.
///
/// Delivery failures are the sink's problem to log; they never reach the order flow.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, receiver: UserId, order: &Order, kind: NotificationKind) -> JoinHandle<()>;
}

/// Client for interacting with the Notification actor.
#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

impl NotificationClient {
    pub fn new(inner: ResourceClient<Notification>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(receiver = %params.receiver, order_id = %params.order_id))]
    pub async fn send(&self, params: NotificationCreate) -> Result<NotificationId, NotificationError> {
        debug!(?params, "send called");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// The receiver's inbox, newest first.
    pub async fn for_receiver(&self, receiver: UserId) -> Result<Vec<Notification>, NotificationError> {
        let mut inbox = self
            .inner
            .list_where(move |n: &Notification| n.receiver == receiver)
            .await
            .map_err(Self::map_error)?;
        inbox.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(inbox)
    }
}

impl NotificationSink for NotificationClient {
    fn notify(&self, receiver: UserId, order: &Order, kind: NotificationKind) -> JoinHandle<()> {
        let client = self.clone();
        let params = NotificationCreate::for_order(kind, order, receiver);
        tokio::spawn(async move {
            if let Err(e) = client.send(params).await {
                warn!(%receiver, ?kind, error = %e, "Notification dropped");
            }
        })
    }
}

#[async_trait]
impl ActorClient<Notification> for NotificationClient {
    type Error = NotificationError;

    fn inner(&self) -> &ResourceClient<Notification> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.entity_error::<NotificationError>()
            .unwrap_or_else(|| NotificationError::ActorCommunicationError(e.to_string()))
    }
}
