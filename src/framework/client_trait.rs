//! # ActorClient Trait
//!
//! Shared read/delete plumbing for the typed clients that wrap a `ResourceClient`.

use super::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Gives a typed client `get`, `list` and `delete` with its own error type.
///
/// Implementors only supply the inner client and the error mapping.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    fn inner(&self) -> &ResourceClient<T>;

    /// Maps transport errors (and boxed entity errors) into `Self::Error`.
    fn map_error(e: FrameworkError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        self.inner().list().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
