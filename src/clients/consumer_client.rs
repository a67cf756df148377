use crate::consumer_actor::{ConsumerAction, ConsumerError};
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Consumer, ConsumerCreate, ConsumerUpdate, UserId};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Consumer actor.
#[derive(Clone)]
pub struct ConsumerClient {
    inner: ResourceClient<Consumer>,
}

impl ConsumerClient {
    pub fn new(inner: ResourceClient<Consumer>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create_consumer(&self, params: ConsumerCreate) -> Result<UserId, ConsumerError> {
        debug!(?params, "create_consumer called");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_consumer(
        &self,
        id: UserId,
        update: ConsumerUpdate,
    ) -> Result<Consumer, ConsumerError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Confirms the account; `true` if it was not confirmed before.
    #[instrument(skip(self))]
    pub async fn confirm(&self, id: UserId) -> Result<bool, ConsumerError> {
        self.inner
            .perform_action(id, ConsumerAction::Confirm)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Consumer> for ConsumerClient {
    type Error = ConsumerError;

    fn inner(&self) -> &ResourceClient<Consumer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        if let Some(inner) = e.entity_error::<ConsumerError>() {
            return inner;
        }
        match e {
            FrameworkError::NotFound(id) => ConsumerError::NotFound(id),
            other => ConsumerError::ActorCommunicationError(other.to_string()),
        }
    }
}
