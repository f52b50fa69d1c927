//! # RemoteResource Trait
//!
//! The seam between the cache actor and the network. The actor only ever talks to a
//! `RemoteResource`, so tests swap the HTTP client for a [`MockRemote`](crate::framework::mock::MockRemote)
//! without the actor noticing.

use crate::framework::entity::CatalogEntity;
use crate::framework::error::RemoteError;
use async_trait::async_trait;

/// List/create/update/delete against a remote collection.
///
/// Each call is a single attempt with exactly one round trip. Implementations do not
/// retry and do not recover errors.
#[async_trait]
pub trait RemoteResource<T: CatalogEntity>: Send + Sync + 'static {
    /// Fetches the full collection.
    async fn list_all(&self) -> Result<Vec<T>, RemoteError>;

    /// Creates an entity; the server assigns its id.
    async fn create(&self, draft: T::Draft) -> Result<T, RemoteError>;

    /// Replaces the entity `id` with `draft`.
    async fn update(&self, id: T::Id, draft: T::Draft) -> Result<T, RemoteError>;

    /// Deletes the entity `id`. Deleting an id that is already gone is not an error.
    async fn delete(&self, id: T::Id) -> Result<(), RemoteError>;
}
