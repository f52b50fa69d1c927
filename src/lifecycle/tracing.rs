//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber::fmt` subscriber filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the actor tags its
//! lines with `entity_type` and `id` fields instead.
//!
//! ```bash
//! # Actor start/stop, loads and settlements
//! RUST_LOG=info cargo run -- widget
//!
//! # Every optimistic step and every HTTP request/response status
//! RUST_LOG=debug cargo run -- widget
//!
//! # Only the HTTP client
//! RUST_LOG=catalog_sync::clients=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a create that the server rejects looks like:
//!
//! ```text
//! DEBUG Optimistic create entity_type="Product" id=local_1
//! DEBUG create: Sending request method=POST url=http://localhost:3000/products name=Widget
//! DEBUG create: Received response status=422 name=Widget
//!  WARN Create failed, placeholder removed entity_type="Product" id=local_1 error=Validation error (422): name taken
//! ```

/// Installs the global subscriber. Call once, before starting the system.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
