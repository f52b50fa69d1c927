use crate::framework::{CacheClient, LoadState};
use crate::model::{DraftError, Product, ProductDraft, ProductForm, ProductId};
use crate::product_actor::ProductError;
use crate::view::ScreenState;
use tracing::{debug, info, instrument};
use validator::Validate;

/// Client for the product catalog cache.
///
/// Every mutation is visible in [`search`](Self::search) and
/// [`screen`](Self::screen) as soon as it is accepted, and settles (or rolls back)
/// when the server answers.
#[derive(Clone)]
pub struct ProductClient {
    inner: CacheClient<Product>,
}

impl ProductClient {
    pub fn new(inner: CacheClient<Product>) -> Self {
        Self { inner }
    }

    /// Fetches the whole catalog and replaces the local snapshot.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> Result<Vec<Product>, ProductError> {
        debug!("Sending load to actor");
        let products = self.inner.load().await?;
        info!(count = products.len(), "Catalog loaded");
        Ok(products)
    }

    /// Validates `draft` and creates the product. An invalid draft never reaches the
    /// snapshot or the server.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        draft.validate().map_err(DraftError::from)?;
        debug!("Sending create to actor");
        Ok(self.inner.create(draft).await?)
    }

    /// Parses the create form and creates the product. Nothing is sent if the form is
    /// invalid.
    pub async fn create_from_form(&self, form: &ProductForm) -> Result<Product, ProductError> {
        let draft = form.parse()?;
        self.create_product(draft).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, ProductError> {
        draft.validate().map_err(DraftError::from)?;
        debug!("Sending update to actor");
        Ok(self.inner.update(id, draft).await?)
    }

    /// Parses the edit form and saves it over `id`.
    pub async fn update_from_form(
        &self,
        id: ProductId,
        form: &ProductForm,
    ) -> Result<Product, ProductError> {
        let draft = form.parse()?;
        self.update_product(id, draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        debug!("Sending delete to actor");
        Ok(self.inner.delete(id).await?)
    }

    /// Current rows whose name or category contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, ProductError> {
        Ok(self.inner.filtered(term).await?)
    }

    pub async fn products(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.inner.snapshot().await?)
    }

    pub async fn load_state(&self) -> Result<LoadState, ProductError> {
        Ok(self.inner.load_state().await?)
    }

    /// What the product table should show for `term` right now.
    pub async fn screen(&self, term: &str) -> Result<ScreenState<Product>, ProductError> {
        let state = self.inner.load_state().await?;
        let items = self.inner.snapshot().await?;
        Ok(ScreenState::derive(&state, &items, term))
    }
}
