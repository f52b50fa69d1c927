//! # Generic Messages
//!
//! Requests sent from a [`CacheClient`](crate::framework::CacheClient) to the
//! [`SnapshotActor`](crate::framework::SnapshotActor), and the settlements the actor's
//! own remote-call tasks send back to it.

use crate::framework::entity::CatalogEntity;
use crate::framework::error::{CacheError, RemoteError};
use crate::framework::LoadState;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, CacheError>>;

/// A mutation request. Mutations on the same id are serialised by the actor.
#[derive(Debug)]
pub enum Mutation<T: CatalogEntity> {
    Create {
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

impl<T: CatalogEntity> Mutation<T> {
    /// Points a queued update or delete at a new id (placeholder confirmed).
    pub(crate) fn retarget(self, new_id: T::Id) -> Self {
        match self {
            Mutation::Update {
                draft, respond_to, ..
            } => Mutation::Update {
                id: new_id,
                draft,
                respond_to,
            },
            Mutation::Delete { respond_to, .. } => Mutation::Delete {
                id: new_id,
                respond_to,
            },
            create @ Mutation::Create { .. } => create,
        }
    }

    /// Answers the caller with `error` without running the mutation.
    pub(crate) fn reject(self, error: CacheError) {
        match self {
            Mutation::Create { respond_to, .. } | Mutation::Update { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            Mutation::Delete { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
        }
    }
}

/// Message type sent to the actor.
#[derive(Debug)]
pub enum CacheRequest<T: CatalogEntity> {
    Load {
        respond_to: Response<Vec<T>>,
    },
    Mutate(Mutation<T>),
    Snapshot {
        respond_to: oneshot::Sender<Vec<T>>,
    },
    State {
        respond_to: oneshot::Sender<LoadState>,
    },
}

/// Outcome of a remote call, reported back to the actor by the task that made it.
#[derive(Debug)]
pub(crate) enum Settlement<T: CatalogEntity> {
    Load {
        generation: u64,
        result: Result<Vec<T>, RemoteError>,
        respond_to: Response<Vec<T>>,
    },
    Create {
        local_id: T::Id,
        result: Result<T, RemoteError>,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        result: Result<T, RemoteError>,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        result: Result<(), RemoteError>,
        respond_to: Response<()>,
    },
}
