use crate::framework::{EntityId, LocalKey};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use validator::{Validate, ValidationError};

/// Identifier of a product.
///
/// Server ids arrive as JSON strings or unsigned integers and are kept as text.
/// `Local` ids only exist for placeholders and never come out of deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawProductId", into = "String")]
pub enum ProductId {
    Remote(String),
    Local(LocalKey),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Number(u64),
}

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::Text(text) => ProductId::Remote(text),
            RawProductId::Number(number) => ProductId::Remote(number.to_string()),
        }
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.to_string()
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Remote(id.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Remote(id) => write!(f, "{}", id),
            ProductId::Local(key) => write!(f, "{}", key),
        }
    }
}

impl EntityId for ProductId {
    fn local(key: LocalKey) -> Self {
        ProductId::Local(key)
    }

    fn as_local(&self) -> Option<LocalKey> {
        match self {
            ProductId::Local(key) => Some(*key),
            ProductId::Remote(_) => None,
        }
    }
}

/// Represents a product in the catalog.
///
/// # Cache Framework
/// This struct implements the [`CatalogEntity`](crate::framework::CatalogEntity) trait,
/// allowing it to be cached by a [`SnapshotActor`](crate::framework::SnapshotActor).
///
/// See [`impl CatalogEntity for Product`](#impl-CatalogEntity-for-Product) for details on:
/// - Draft payload ([`ProductDraft`])
/// - Search matching (name or category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub sales: u32,
}

impl Product {
    /// Creates a Product from an id and a draft.
    pub fn new(id: impl Into<ProductId>, draft: ProductDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            category: draft.category,
            price: draft.price,
            stock: draft.stock,
            sales: draft.sales,
        }
    }

    /// True until the server has confirmed this product.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_local()
    }
}

/// Payload for creating or replacing a product.
///
/// All fields are required. `price`, `stock` and `sales` must not be negative; the
/// integer fields are unsigned so only `price` needs a runtime check, which also
/// rejects NaN and infinities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(
        range(min = 0.0, message = "Price must not be negative"),
        custom(function = "validate_finite")
    )]
    pub price: f64,

    pub stock: u32,

    pub sales: u32,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock: u32,
        sales: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            stock,
            sales,
        }
    }
}

fn validate_finite(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() {
        Ok(())
    } else {
        let mut error = ValidationError::new("finite");
        error.message = Some("Price must be a finite number".into());
        Err(error)
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            sales: product.sales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_accepts_string_and_number() {
        let text: Product = serde_json::from_str(
            r#"{"id":"abc","name":"X","category":"Y","price":1.5,"stock":2,"sales":0}"#,
        )
        .unwrap();
        assert_eq!(text.id, ProductId::from("abc"));

        let number: Product = serde_json::from_str(
            r#"{"id":42,"name":"X","category":"Y","price":1,"stock":2,"sales":0}"#,
        )
        .unwrap();
        assert_eq!(number.id, ProductId::from("42"));
        assert!(!number.is_placeholder());
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let draft = ProductDraft::new("X", "Y", 1.0, 2, 0);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name":"X","category":"Y","price":1.0,"stock":2,"sales":0})
        );
    }

    #[test]
    fn test_draft_validation() {
        assert!(ProductDraft::new("X", "Y", 0.0, 0, 0).validate().is_ok());

        let errors = ProductDraft::new("", "Y", -1.0, 0, 0).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(!fields.contains_key("category"));
    }

    #[test]
    fn test_draft_validation_rejects_non_finite_price() {
        for price in [f64::NAN, f64::INFINITY] {
            let errors = ProductDraft::new("X", "Y", price, 0, 0).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("price"));
        }
    }

    #[test]
    fn test_local_id_display() {
        let id = ProductId::local(LocalKey(3));
        assert_eq!(id.to_string(), "local_3");
        assert_eq!(id.as_local(), Some(LocalKey(3)));
    }
}
