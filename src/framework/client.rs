//! # Cache Client
//!
//! The handle the rest of the application uses to talk to a [`SnapshotActor`](crate::framework::SnapshotActor).

use crate::framework::entity::CatalogEntity;
use crate::framework::error::CacheError;
use crate::framework::message::{CacheRequest, Mutation};
use crate::framework::snapshot::filter;
use crate::framework::state::LoadState;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `SnapshotActor`.
///
/// Holds only a sender, so cloning is cheap. Every method returns once the actor has
/// answered; mutations answer only after their remote call has settled, but the
/// optimistic change is visible to [`snapshot`](Self::snapshot) as soon as the actor
/// has accepted the request.
#[derive(Clone)]
pub struct CacheClient<T: CatalogEntity> {
    sender: mpsc::Sender<CacheRequest<T>>,
}

impl<T: CatalogEntity> CacheClient<T> {
    pub fn new(sender: mpsc::Sender<CacheRequest<T>>) -> Self {
        Self { sender }
    }

    /// Fetches the whole collection and replaces the snapshot with it.
    pub async fn load(&self) -> Result<Vec<T>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CacheRequest::Load { respond_to }).await?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }

    pub async fn create(&self, draft: T::Draft) -> Result<T, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CacheRequest::Mutate(Mutation::Create { draft, respond_to }))
            .await?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }

    pub async fn update(&self, id: T::Id, draft: T::Draft) -> Result<T, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CacheRequest::Mutate(Mutation::Update {
            id,
            draft,
            respond_to,
        }))
        .await?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CacheRequest::Mutate(Mutation::Delete { id, respond_to }))
            .await?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }

    /// The current snapshot, optimistic changes included.
    pub async fn snapshot(&self) -> Result<Vec<T>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CacheRequest::Snapshot { respond_to }).await?;
        response.await.map_err(|_| CacheError::ActorDropped)
    }

    /// The current snapshot narrowed to entries matching `term`.
    pub async fn filtered(&self, term: &str) -> Result<Vec<T>, CacheError> {
        let items = self.snapshot().await?;
        Ok(filter(&items, term).into_iter().cloned().collect())
    }

    pub async fn load_state(&self) -> Result<LoadState, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CacheRequest::State { respond_to }).await?;
        response.await.map_err(|_| CacheError::ActorDropped)
    }

    async fn send(&self, request: CacheRequest<T>) -> Result<(), CacheError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| CacheError::ActorClosed)
    }
}
