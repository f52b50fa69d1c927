//! # Snapshot Actor
//!
//! This module defines the `SnapshotActor`, the component that owns the optimistic copy
//! of a remote collection. It processes client requests sequentially, applies
//! speculative patches immediately, and reconciles or rolls them back when the remote
//! call settles.

use crate::framework::client::CacheClient;
use crate::framework::entity::{CatalogEntity, EntityId, LocalKey};
use crate::framework::error::{CacheError, RemoteError};
use crate::framework::message::{CacheRequest, Mutation, Response, Settlement};
use crate::framework::remote::RemoteResource;
use crate::framework::snapshot::Snapshot;
use crate::framework::state::LoadState;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Bookkeeping for a mutation whose remote call has not settled yet.
///
/// `epoch` is the value of `replaced_epoch` when the optimistic step ran. A rollback
/// only touches the snapshot if no successful load has replaced it since.
#[derive(Debug)]
enum Pending<T: CatalogEntity> {
    Create {
        placeholder: T,
    },
    Update {
        previous: Option<T>,
        draft: T::Draft,
        epoch: u64,
    },
    Delete {
        removed: Option<(usize, T)>,
        epoch: u64,
    },
}

/// The actor that owns a collection snapshot.
///
/// # Architecture Note
/// This struct is the "Server" half. It owns the snapshot, the in-flight table and
/// the receiver end of the request channel. Remote calls run in spawned tasks and
/// report back over a second channel, so a slow request never blocks the loop.
///
/// **Concurrency Model**:
/// - The snapshot is only touched inside `run`, so it needs no lock.
/// - At most one mutation per id is in flight. Further mutations for a busy id wait
///   in a FIFO queue and run (optimistic step included) once the previous one settles.
/// - Mutations on different ids overlap freely.
/// - Loads are numbered. A load that completes after a later one was applied is
///   discarded and its caller gets [`CacheError::Superseded`].
///
/// # Operations
///
/// * **Create**: prepend a placeholder with a fresh local id, call the remote. On
///   success the placeholder is replaced in place by the server entity; on failure
///   it is removed.
/// * **Update**: overwrite the entry with the draft applied, call the remote. On
///   success the server entity is written; on failure the previous value is restored.
/// * **Delete**: remove the entry remembering its index, call the remote. On failure
///   it is reinserted at that index.
/// * **Load**: fetch everything and replace the snapshot. With
///   `merge_pending_on_load` the optimistic state of in-flight mutations is applied
///   again on top of the fresh list; otherwise a load may discard it.
pub struct SnapshotActor<T: CatalogEntity, R: RemoteResource<T>> {
    receiver: mpsc::Receiver<CacheRequest<T>>,
    settle_tx: mpsc::UnboundedSender<Settlement<T>>,
    settle_rx: mpsc::UnboundedReceiver<Settlement<T>>,
    remote: Arc<R>,
    snapshot: Snapshot<T>,
    state: LoadState,
    in_flight: HashMap<T::Id, Pending<T>>,
    waiting: HashMap<T::Id, VecDeque<Mutation<T>>>,
    issued_loads: u64,
    /// Generation of the newest settled load, failed or not. Older ones are stale.
    applied_load: u64,
    /// Bumped only when a load actually replaces the snapshot.
    replaced_epoch: u64,
    loads_in_flight: usize,
    next_local: u64,
    merge_pending_on_load: bool,
}

impl<T: CatalogEntity, R: RemoteResource<T>> SnapshotActor<T, R> {
    /// Creates a new `SnapshotActor` and its associated `CacheClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, client
    /// calls wait for space.
    pub fn new(remote: R, buffer_size: usize) -> (Self, CacheClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            settle_tx,
            settle_rx,
            remote: Arc::new(remote),
            snapshot: Snapshot::new(),
            state: LoadState::Idle,
            in_flight: HashMap::new(),
            waiting: HashMap::new(),
            issued_loads: 0,
            applied_load: 0,
            replaced_epoch: 0,
            loads_in_flight: 0,
            next_local: 1,
            merge_pending_on_load: false,
        };
        (actor, CacheClient::new(sender))
    }

    /// Re-apply in-flight optimistic state after each load instead of dropping it.
    pub fn merge_pending_on_load(mut self, enabled: bool) -> Self {
        self.merge_pending_on_load = enabled;
        self
    }

    /// Runs the event loop until every client is dropped and every remote call has
    /// settled.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Product" instead of "catalog_sync::model::product::Product")
        let entity_type = entity_type::<T>();
        info!(entity_type, "Actor started");

        let mut closed = false;
        loop {
            tokio::select! {
                request = self.receiver.recv(), if !closed => match request {
                    Some(request) => self.handle(request),
                    None => {
                        closed = true;
                        debug!(entity_type, pending = self.pending(), "All clients dropped");
                    }
                },
                Some(settlement) = self.settle_rx.recv() => self.settle(settlement),
                else => break,
            }
            if closed && self.pending() == 0 {
                break;
            }
        }

        info!(entity_type, size = self.snapshot.len(), "Shutdown");
    }

    fn pending(&self) -> usize {
        self.in_flight.len() + self.loads_in_flight
    }

    fn handle(&mut self, request: CacheRequest<T>) {
        match request {
            CacheRequest::Load { respond_to } => self.start_load(respond_to),
            CacheRequest::Mutate(mutation) => self.submit(mutation),
            CacheRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot.to_vec());
            }
            CacheRequest::State { respond_to } => {
                let _ = respond_to.send(self.state.clone());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    fn start_load(&mut self, respond_to: Response<Vec<T>>) {
        self.issued_loads += 1;
        self.loads_in_flight += 1;
        self.state.on_load_started();
        let generation = self.issued_loads;
        debug!(entity_type = entity_type::<T>(), generation, "Load");

        let remote = Arc::clone(&self.remote);
        let settle = self.settle_tx.clone();
        tokio::spawn(async move {
            let result = remote.list_all().await;
            let _ = settle.send(Settlement::Load {
                generation,
                result,
                respond_to,
            });
        });
    }

    fn submit(&mut self, mutation: Mutation<T>) {
        let id = match &mutation {
            Mutation::Create { .. } => None,
            Mutation::Update { id, .. } | Mutation::Delete { id, .. } => Some(id.clone()),
        };
        let Some(id) = id else {
            return self.start(mutation);
        };

        if self.in_flight.contains_key(&id) {
            debug!(entity_type = entity_type::<T>(), %id, "Queued behind in-flight mutation");
            self.waiting.entry(id).or_default().push_back(mutation);
        } else if id.is_local() {
            warn!(entity_type = entity_type::<T>(), %id, "Mutation on unconfirmed entry");
            mutation.reject(CacheError::Unconfirmed(id.to_string()));
        } else {
            self.start(mutation);
        }
    }

    /// Applies the optimistic step and dispatches the remote call.
    /// The caller guarantees no other mutation for the same id is in flight.
    fn start(&mut self, mutation: Mutation<T>) {
        let entity_type = entity_type::<T>();
        let remote = Arc::clone(&self.remote);
        let settle = self.settle_tx.clone();

        match mutation {
            Mutation::Create { draft, respond_to } => {
                let local_id = T::Id::local(LocalKey(self.next_local));
                self.next_local += 1;

                let placeholder = T::from_draft(local_id.clone(), draft.clone());
                self.snapshot.prepend(placeholder.clone());
                self.in_flight
                    .insert(local_id.clone(), Pending::Create { placeholder });
                debug!(entity_type, id = %local_id, ?draft, "Optimistic create");

                tokio::spawn(async move {
                    let result = remote.create(draft).await;
                    let _ = settle.send(Settlement::Create {
                        local_id,
                        result,
                        respond_to,
                    });
                });
            }
            Mutation::Update {
                id,
                draft,
                respond_to,
            } => {
                let previous = self.snapshot.get(&id).cloned();
                match &previous {
                    Some(item) => {
                        let mut optimistic = item.clone();
                        optimistic.apply(draft.clone());
                        self.snapshot.replace(&id, optimistic);
                        debug!(entity_type, %id, ?draft, "Optimistic update");
                    }
                    None => debug!(entity_type, %id, "Update for entry not in snapshot"),
                }
                self.in_flight.insert(
                    id.clone(),
                    Pending::Update {
                        previous,
                        draft: draft.clone(),
                        epoch: self.replaced_epoch,
                    },
                );

                tokio::spawn(async move {
                    let result = remote.update(id.clone(), draft).await;
                    let _ = settle.send(Settlement::Update {
                        id,
                        result,
                        respond_to,
                    });
                });
            }
            Mutation::Delete { id, respond_to } => {
                let removed = self.snapshot.remove(&id);
                match &removed {
                    Some((index, _)) => debug!(entity_type, %id, index, "Optimistic delete"),
                    None => debug!(entity_type, %id, "Delete for entry not in snapshot"),
                }
                self.in_flight.insert(
                    id.clone(),
                    Pending::Delete {
                        removed,
                        epoch: self.replaced_epoch,
                    },
                );

                tokio::spawn(async move {
                    let result = remote.delete(id.clone()).await;
                    let _ = settle.send(Settlement::Delete {
                        id,
                        result,
                        respond_to,
                    });
                });
            }
        }
    }

    // -------------------------------------------------------------------------
    // Settlements
    // -------------------------------------------------------------------------

    fn settle(&mut self, settlement: Settlement<T>) {
        match settlement {
            Settlement::Load {
                generation,
                result,
                respond_to,
            } => self.settle_load(generation, result, respond_to),
            Settlement::Create {
                local_id,
                result,
                respond_to,
            } => self.settle_create(local_id, result, respond_to),
            Settlement::Update {
                id,
                result,
                respond_to,
            } => self.settle_update(id, result, respond_to),
            Settlement::Delete {
                id,
                result,
                respond_to,
            } => self.settle_delete(id, result, respond_to),
        }
    }

    fn settle_load(
        &mut self,
        generation: u64,
        result: Result<Vec<T>, RemoteError>,
        respond_to: Response<Vec<T>>,
    ) {
        let entity_type = entity_type::<T>();
        self.loads_in_flight -= 1;

        if generation <= self.applied_load {
            debug!(entity_type, generation, applied = self.applied_load, "Stale load discarded");
            let _ = respond_to.send(Err(CacheError::Superseded));
            return;
        }
        self.applied_load = generation;

        match result {
            Ok(items) => {
                self.replaced_epoch += 1;
                let duplicates = self.snapshot.replace_all(items);
                if duplicates > 0 {
                    warn!(entity_type, duplicates, "Dropped duplicate ids from load");
                }
                if self.merge_pending_on_load {
                    self.reapply_pending();
                }
                self.state.on_load_finished(Ok(()));
                info!(entity_type, generation, size = self.snapshot.len(), "Loaded");
                let _ = respond_to.send(Ok(self.snapshot.to_vec()));
            }
            Err(e) => {
                self.state.on_load_finished(Err(&e));
                warn!(entity_type, generation, error = %e, "Load failed");
                let _ = respond_to.send(Err(e.into()));
            }
        }
    }

    fn settle_create(
        &mut self,
        local_id: T::Id,
        result: Result<T, RemoteError>,
        respond_to: Response<T>,
    ) {
        let entity_type = entity_type::<T>();
        self.in_flight.remove(&local_id);

        match result {
            Ok(confirmed) => {
                let id = confirmed.id().clone();
                if self.snapshot.contains(&local_id) {
                    self.snapshot.replace(&local_id, confirmed.clone());
                } else if self.snapshot.contains(&id) {
                    self.snapshot.replace(&id, confirmed.clone());
                } else {
                    self.snapshot.prepend(confirmed.clone());
                }
                info!(entity_type, local = %local_id, %id, size = self.snapshot.len(), "Created");
                let _ = respond_to.send(Ok(confirmed));

                if let Some(queue) = self.waiting.remove(&local_id) {
                    let retargeted = queue
                        .into_iter()
                        .map(|mutation| mutation.retarget(id.clone()));
                    self.waiting.entry(id.clone()).or_default().extend(retargeted);
                    if !self.in_flight.contains_key(&id) {
                        self.advance(&id);
                    }
                }
            }
            Err(e) => {
                self.snapshot.remove(&local_id);
                warn!(entity_type, id = %local_id, error = %e, "Create failed, placeholder removed");
                let _ = respond_to.send(Err(e.into()));

                if let Some(queue) = self.waiting.remove(&local_id) {
                    for mutation in queue {
                        mutation.reject(CacheError::Abandoned(local_id.to_string()));
                    }
                }
            }
        }
    }

    fn settle_update(
        &mut self,
        id: T::Id,
        result: Result<T, RemoteError>,
        respond_to: Response<T>,
    ) {
        let entity_type = entity_type::<T>();
        let pending = self.in_flight.remove(&id);

        match result {
            Ok(confirmed) => {
                if self.snapshot.contains(&id) {
                    self.snapshot.replace(&id, confirmed.clone());
                }
                info!(entity_type, %id, "Updated");
                let _ = respond_to.send(Ok(confirmed));
            }
            Err(e) => {
                if let Some(Pending::Update {
                    previous: Some(previous),
                    epoch,
                    ..
                }) = pending
                {
                    if epoch == self.replaced_epoch {
                        self.snapshot.replace(&id, previous);
                    }
                }
                warn!(entity_type, %id, error = %e, "Update failed, rolled back");
                let _ = respond_to.send(Err(e.into()));
            }
        }
        self.advance(&id);
    }

    fn settle_delete(
        &mut self,
        id: T::Id,
        result: Result<(), RemoteError>,
        respond_to: Response<()>,
    ) {
        let entity_type = entity_type::<T>();
        let pending = self.in_flight.remove(&id);

        match result {
            Ok(()) => {
                self.snapshot.remove(&id);
                info!(entity_type, %id, size = self.snapshot.len(), "Deleted");
                let _ = respond_to.send(Ok(()));
            }
            Err(e) => {
                if let Some(Pending::Delete {
                    removed: Some((index, item)),
                    epoch,
                }) = pending
                {
                    if epoch == self.replaced_epoch {
                        self.snapshot.insert_at(index, item);
                    }
                }
                warn!(entity_type, %id, error = %e, "Delete failed, rolled back");
                let _ = respond_to.send(Err(e.into()));
            }
        }
        self.advance(&id);
    }

    /// Starts the next queued mutation for `id`, if any.
    fn advance(&mut self, id: &T::Id) {
        let Some(queue) = self.waiting.get_mut(id) else {
            return;
        };
        let next = queue.pop_front();
        if queue.is_empty() {
            self.waiting.remove(id);
        }
        if let Some(mutation) = next {
            self.start(mutation);
        }
    }

    /// Puts the optimistic state of every in-flight mutation back on top of a freshly
    /// loaded snapshot, and re-bases their rollback data on it.
    fn reapply_pending(&mut self) {
        let epoch = self.replaced_epoch;

        let mut placeholders: Vec<(LocalKey, T)> = self
            .in_flight
            .values()
            .filter_map(|pending| match pending {
                Pending::Create { placeholder } => placeholder
                    .id()
                    .as_local()
                    .map(|key| (key, placeholder.clone())),
                _ => None,
            })
            .collect();
        placeholders.sort_by_key(|(key, _)| *key);
        for (_, placeholder) in placeholders {
            self.snapshot.prepend(placeholder);
        }

        for (id, pending) in self.in_flight.iter_mut() {
            match pending {
                Pending::Create { .. } => {}
                Pending::Update {
                    previous,
                    draft,
                    epoch: pending_epoch,
                } => {
                    *pending_epoch = epoch;
                    *previous = self.snapshot.get(id).cloned();
                    if let Some(fresh) = previous.as_ref() {
                        let mut optimistic = fresh.clone();
                        optimistic.apply(draft.clone());
                        self.snapshot.replace(id, optimistic);
                    }
                }
                Pending::Delete {
                    removed,
                    epoch: pending_epoch,
                } => {
                    *pending_epoch = epoch;
                    *removed = self.snapshot.remove(id);
                }
            }
        }
        debug!(entity_type = entity_type::<T>(), pending = self.in_flight.len(), "Re-applied in-flight mutations");
    }
}

fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}
