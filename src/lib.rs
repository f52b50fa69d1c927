//! # catalog-sync
//!
//! A client for a product catalog REST API that keeps a local snapshot of the
//! catalog and edits it optimistically.
//!
//! Create, update and delete change the snapshot immediately. The matching HTTP
//! call runs in the background; when it succeeds the server's version replaces the
//! speculative one, when it fails the change is rolled back and the error is
//! returned to the caller.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! A generic [`SnapshotActor`](framework::SnapshotActor) that owns the snapshot of any
//! [`CatalogEntity`](framework::CatalogEntity) and talks to the network only through
//! the [`RemoteResource`](framework::RemoteResource) trait.
//! - One task owns the snapshot, so there are no locks.
//! - At most one mutation per id is in flight; later ones queue behind it.
//! - A load that finishes after a newer load was applied is discarded.
//!
//! ### 2. The Domain ([`model`], [`product_actor`])
//! [`Product`](model::Product), its id and draft types, form parsing and the
//! [`ProductError`](product_actor::ProductError) type.
//!
//! ### 3. The Interface ([`clients`], [`view`])
//! [`HttpProductClient`](clients::HttpProductClient) speaks to `/products`;
//! [`ProductClient`](clients::ProductClient) is what the application calls;
//! [`ScreenState`](view::ScreenState) is what a table shows.
//!
//! ### 4. The Orchestrator ([`lifecycle`], [`config`])
//! [`CatalogSystem`](lifecycle::CatalogSystem) wires it all up from a
//! [`Config`](config::Config) read from the environment.
//!
//! ## Quick Start
//!
//! ```bash
//! CATALOG_API_URL=http://localhost:3000 RUST_LOG=info cargo run -- gadget
//! ```
//!
//! ## Testing
//!
//! See [`framework::mock`] for remotes that let you drive the cache without a server.

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod product_actor;
pub mod view;
