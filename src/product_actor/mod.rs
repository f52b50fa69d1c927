//! # Product Actor
//!
//! The product catalog cache: a [`SnapshotActor`] specialised for [`Product`].
//!
//! ## Structure
//!
//! - [`entity`] - [`CatalogEntity`](crate::framework::CatalogEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, cache) = product_actor::new(HttpProductClient::new(&config)?, 32);
//! tokio::spawn(actor.run());
//! let client = ProductClient::new(cache);
//! client.load_products().await?;
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::framework::{CacheClient, RemoteResource, SnapshotActor};
use crate::model::Product;

/// Creates a new Product actor and its client.
pub fn new<R: RemoteResource<Product>>(
    remote: R,
    buffer_size: usize,
) -> (SnapshotActor<Product, R>, CacheClient<Product>) {
    SnapshotActor::new(remote, buffer_size)
}
