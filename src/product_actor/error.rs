//! Error types for the product catalog.

use crate::framework::{CacheError, RemoteError};
use crate::model::DraftError;
use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// The form input could not be turned into a valid draft. Nothing was sent.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// The cache or the server rejected the operation. Optimistic changes have
    /// already been rolled back when this is returned.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ProductError {
    /// The remote error behind this failure, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            ProductError::Cache(e) => e.remote(),
            ProductError::Draft(_) => None,
        }
    }
}

impl From<RemoteError> for ProductError {
    fn from(e: RemoteError) -> Self {
        ProductError::Cache(CacheError::Remote(e))
    }
}
