//! # Mock Remotes
//!
//! Utilities for testing the cache actor (and anything built on it) without a server.
//!
//! Two styles are available:
//!
//! - [`MockRemote`]: a fluent expectation queue. Each call pops the next expectation
//!   and returns its canned response. Use it when only the outcome matters.
//! - [`create_mock_remote`]: every call is forwarded to a receiver you hold, together
//!   with its responder. Use it when the test must look at the snapshot *while* a
//!   remote call is still pending, or must resolve calls in a chosen order.
//!
//! ```rust,ignore
//! let mut mock = MockRemote::<Product>::new();
//! mock.expect_list().return_ok(vec![widget.clone()]);
//! mock.expect_delete(widget.id.clone()).return_err(RemoteError::Server { status: Some(500), message: "boom".into() });
//!
//! let (actor, client) = SnapshotActor::new(mock.clone(), 8);
//! tokio::spawn(actor.run());
//! // ...
//! mock.verify();
//! ```

use crate::framework::entity::CatalogEntity;
use crate::framework::error::RemoteError;
use crate::framework::remote::RemoteResource;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected call on the mock remote.
enum Expectation<T: CatalogEntity> {
    List {
        response: Result<Vec<T>, RemoteError>,
    },
    Create {
        response: Result<T, RemoteError>,
    },
    Update {
        id: T::Id,
        response: Result<T, RemoteError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), RemoteError>,
    },
}

struct MockState<T: CatalogEntity> {
    expectations: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

/// A mock remote with expectation tracking for fluent testing.
///
/// Clones share the same expectation queue, so keep one clone for `verify()` and
/// hand the other to the actor.
pub struct MockRemote<T: CatalogEntity> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: CatalogEntity> Clone for MockRemote<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: CatalogEntity> Default for MockRemote<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CatalogEntity> MockRemote<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                mismatches: Vec::new(),
            })),
        }
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Verifies that all expectations were met and no unexpected call was made.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.mismatches.is_empty() {
            panic!("Unexpected remote calls: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn builder<V>(
        &mut self,
        make: impl FnOnce(Result<V, RemoteError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, V> {
        ExpectationBuilder {
            state: Arc::clone(&self.state),
            make: Box::new(make),
        }
    }

    fn next(&self) -> Option<Expectation<T>> {
        self.state.lock().unwrap().expectations.pop_front()
    }

    fn mismatch(&self, call: String) -> RemoteError {
        self.state.lock().unwrap().mismatches.push(call.clone());
        RemoteError::Transport(format!("unexpected call: {}", call))
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: CatalogEntity, V> {
    state: Arc<Mutex<MockState<T>>>,
    make: Box<dyn FnOnce(Result<V, RemoteError>) -> Expectation<T> + Send>,
}

impl<T: CatalogEntity, V> ExpectationBuilder<T, V> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: V) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: RemoteError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<V, RemoteError>) {
        let expectation = (self.make)(response);
        self.state.lock().unwrap().expectations.push_back(expectation);
    }
}

#[async_trait]
impl<T: CatalogEntity> RemoteResource<T> for MockRemote<T> {
    async fn list_all(&self) -> Result<Vec<T>, RemoteError> {
        match self.next() {
            Some(Expectation::List { response }) => response,
            _ => Err(self.mismatch("list_all".to_string())),
        }
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RemoteError> {
        match self.next() {
            Some(Expectation::Create { response }) => response,
            _ => Err(self.mismatch(format!("create({:?})", draft))),
        }
    }

    async fn update(&self, id: T::Id, draft: T::Draft) -> Result<T, RemoteError> {
        match self.next() {
            Some(Expectation::Update {
                id: expected,
                response,
            }) if expected == id => response,
            _ => Err(self.mismatch(format!("update({}, {:?})", id, draft))),
        }
    }

    async fn delete(&self, id: T::Id) -> Result<(), RemoteError> {
        match self.next() {
            Some(Expectation::Delete {
                id: expected,
                response,
            }) if expected == id => response,
            _ => Err(self.mismatch(format!("delete({})", id))),
        }
    }
}

// =============================================================================
// CHANNEL-BACKED REMOTE
// =============================================================================

/// Type alias for the responder of a pending remote call.
pub type Responder<V> = oneshot::Sender<Result<V, RemoteError>>;

/// A remote call captured by a [`ChannelRemote`], waiting for the test to answer it.
#[derive(Debug)]
pub enum RemoteCall<T: CatalogEntity> {
    List {
        respond_to: Responder<Vec<T>>,
    },
    Create {
        draft: T::Draft,
        respond_to: Responder<T>,
    },
    Update {
        id: T::Id,
        draft: T::Draft,
        respond_to: Responder<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Responder<()>,
    },
}

/// Remote that forwards every call to a test-held receiver.
pub struct ChannelRemote<T: CatalogEntity> {
    sender: mpsc::Sender<RemoteCall<T>>,
}

impl<T: CatalogEntity> ChannelRemote<T> {
    async fn call<V: Send>(
        &self,
        make: impl FnOnce(Responder<V>) -> RemoteCall<T> + Send,
    ) -> Result<V, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| RemoteError::Transport("mock receiver dropped".to_string()))?;
        response
            .await
            .map_err(|_| RemoteError::Transport("mock responder dropped".to_string()))?
    }
}

#[async_trait]
impl<T: CatalogEntity> RemoteResource<T> for ChannelRemote<T> {
    async fn list_all(&self) -> Result<Vec<T>, RemoteError> {
        self.call(|respond_to| RemoteCall::List { respond_to }).await
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RemoteError> {
        self.call(|respond_to| RemoteCall::Create { draft, respond_to })
            .await
    }

    async fn update(&self, id: T::Id, draft: T::Draft) -> Result<T, RemoteError> {
        self.call(|respond_to| RemoteCall::Update {
            id,
            draft,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: T::Id) -> Result<(), RemoteError> {
        self.call(|respond_to| RemoteCall::Delete { id, respond_to })
            .await
    }
}

/// Creates a channel-backed remote and the receiver its calls arrive on.
///
/// # Testing Strategy
/// The actor issues remote calls from spawned tasks. With this remote every call
/// parks until the test answers it, which makes it possible to assert on the
/// optimistic snapshot and to resolve concurrent calls in a deterministic order.
pub fn create_mock_remote<T: CatalogEntity>(
    buffer_size: usize,
) -> (ChannelRemote<T>, mpsc::Receiver<RemoteCall<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelRemote { sender }, receiver)
}

/// Helper to verify that the next call is a list.
pub async fn expect_list<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<Responder<Vec<T>>> {
    match receiver.recv().await {
        Some(RemoteCall::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next call is a create.
pub async fn expect_create<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Draft, Responder<T>)> {
    match receiver.recv().await {
        Some(RemoteCall::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is an update.
pub async fn expect_update<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Id, T::Draft, Responder<T>)> {
    match receiver.recv().await {
        Some(RemoteCall::Update {
            id,
            draft,
            respond_to,
        }) => Some((id, draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a delete.
pub async fn expect_delete<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(RemoteCall::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
