//! Cart error types.

use thiserror::Error;

use crate::ids::ProductId;

/// Errors that can occur in cart operations.
///
/// Cart edits and checkout never return these; checkout failures are folded
/// into [`CheckoutStatus`](crate::checkout::CheckoutStatus) instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A line item refers to a product the catalog does not know.
    #[error("Product not found in catalog: {0}")]
    ProductNotFound(ProductId),

    /// Arithmetic overflow while totalling the cart.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::Config(e.to_string())
    }
}
