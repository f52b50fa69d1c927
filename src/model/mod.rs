//! Pure data structures (DTOs) for the product catalog.

pub mod form;
pub mod product;

pub use form::*;
pub use product::*;
