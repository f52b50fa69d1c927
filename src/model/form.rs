//! Raw create/edit form input and its conversion into a [`ProductDraft`].

use crate::model::product::{Product, ProductDraft};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Errors produced while turning form input into a draft.
#[derive(Debug, Error)]
pub enum DraftError {
    /// A numeric field could not be parsed.
    #[error("Invalid value for {field}: {value:?}")]
    Field { field: &'static str, value: String },

    /// The parsed draft breaks a field constraint.
    #[error("Invalid product: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Text as typed into the product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub sales: String,
}

impl Default for ProductForm {
    /// An empty create form: blank text, zero numbers.
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            price: "0.0".to_string(),
            stock: "0".to_string(),
            sales: "0".to_string(),
        }
    }
}

impl From<&Product> for ProductForm {
    /// An edit form pre-filled from an existing row.
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            sales: product.sales.to_string(),
        }
    }
}

impl ProductForm {
    /// Parses and validates the form.
    pub fn parse(&self) -> Result<ProductDraft, DraftError> {
        let draft = ProductDraft {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: parse_field("price", &self.price)?,
            stock: parse_field("stock", &self.stock)?,
            sales: parse_field("sales", &self.sales)?,
        };
        draft.validate()?;
        Ok(draft)
    }
}

fn parse_field<V: std::str::FromStr>(field: &'static str, raw: &str) -> Result<V, DraftError> {
    raw.trim().parse().map_err(|_| DraftError::Field {
        field,
        value: raw.to_string(),
    })
}
