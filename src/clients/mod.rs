//! Clients for the product catalog: the HTTP remote and the cache-facing wrapper.

pub mod http_client;
pub mod product_client;

pub use http_client::*;
pub use product_client::*;
