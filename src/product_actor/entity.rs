//! CatalogEntity trait implementation for the Product domain type.
//!
//! This module contains the [`CatalogEntity`] trait implementation
//! that enables [`Product`] to be cached by the generic [`crate::framework::SnapshotActor`].
//!
//! See the trait implementation on [`Product`] for method documentation.

use crate::framework::CatalogEntity;
use crate::model::{Product, ProductDraft, ProductId};

impl CatalogEntity for Product {
    type Id = ProductId;
    type Draft = ProductDraft;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Builds a placeholder row shown until the server answers.
    fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self::new(id, draft)
    }

    /// Overwrites every editable field; the id is kept.
    fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.price = draft.price;
        self.stock = draft.stock;
        self.sales = draft.sales;
    }

    /// Matches on name or category.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}
