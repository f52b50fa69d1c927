//! # System Lifecycle
//!
//! Starting and stopping the catalog: [`CatalogSystem`] builds the HTTP remote from a
//! [`Config`](crate::config::Config), spawns the cache actor and hands out a
//! [`ProductClient`](crate::clients::ProductClient). [`setup_tracing`] installs the
//! log subscriber once per process.
//!
//! ```rust,ignore
//! setup_tracing();
//! let system = CatalogSystem::new(Config::from_env()?)?;
//! system.product_client.load_products().await?;
//! system.shutdown().await?;
//! ```

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use self::tracing::*;
