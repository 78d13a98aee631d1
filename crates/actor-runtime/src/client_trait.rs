//! # ActorClient Trait
//!
//! Common interface for resource-specific client wrappers: they expose their inner
//! `ResourceClient`, say how runtime errors become domain errors, and inherit `get` for free.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients built on a `ResourceClient`.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map runtime errors to the resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }
}
