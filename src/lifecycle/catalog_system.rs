use crate::clients::{HttpProductClient, ProductClient};
use crate::config::Config;
use crate::framework::{RemoteError, RemoteResource};
use crate::model::Product;
use tracing::{error, info};

/// Runs the product cache and owns its task.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::new(Config::new(Url::parse("http://localhost:3000")?))?;
///
/// system.product_client.load_products().await?;
/// let rows = system.product_client.search("widget").await?;
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    /// Client for the product cache
    pub product_client: ProductClient,

    /// Task handle of the cache actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogSystem {
    /// Builds the HTTP client from `config` and starts the product actor on it.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: Config) -> Result<Self, RemoteError> {
        let remote = HttpProductClient::new(&config)?;
        info!(base_url = %remote.base_url(), "Starting catalog system");
        Ok(Self::with_remote(remote, &config))
    }

    /// Starts the product actor on any remote, using the cache settings from `config`.
    pub fn with_remote<R: RemoteResource<Product>>(remote: R, config: &Config) -> Self {
        let (actor, cache) = crate::product_actor::new(remote, config.buffer_size);
        let actor = actor.merge_pending_on_load(config.merge_pending_on_load);
        let handle = tokio::spawn(actor.run());

        Self {
            product_client: ProductClient::new(cache),
            handle,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the client closes the request channel. The actor then lets every
    /// in-flight remote call settle before it exits, so this waits for them too.
    ///
    /// Clones of `product_client` held elsewhere keep the actor alive; drop them first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor shut down cleanly
    /// - `Err(String)` if the actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.product_client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
