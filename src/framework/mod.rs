//! Generic optimistic cache for a remote collection.
//!
//! This module provides the building blocks for keeping a local, ordered copy of a
//! server-side collection and mutating it optimistically.
//!
//! # Main Components
//!
//! - [`CatalogEntity`] - Trait that resource types implement to be cached
//! - [`SnapshotActor`] - Actor that owns the snapshot and reconciles remote results
//! - [`CacheClient`] - Cloneable handle for talking to the actor
//! - [`RemoteResource`] - Seam to the network (list/create/update/delete)
//! - [`RemoteError`], [`CacheError`] - Error types
//!
//! # Testing
//!
//! See [`mock`] module for remotes that let you test without a server.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod remote;
pub mod snapshot;
pub mod state;

// Re-export core types for convenience
pub use actor::SnapshotActor;
pub use client::CacheClient;
pub use entity::{CatalogEntity, EntityId, LocalKey};
pub use error::{CacheError, RemoteError};
pub use message::{CacheRequest, Mutation, Response};
pub use remote::RemoteResource;
pub use snapshot::{filter, Snapshot};
pub use state::LoadState;
