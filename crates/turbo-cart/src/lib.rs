//! Client-side cart state core for TurboCommerce.
//!
//! This crate provides:
//!
//! - **Cart**: line items keyed by product id, with add / remove / set
//!   quantity edits that never fail
//! - **Checkout**: a three-state async workflow (ready, loading, error)
//!   driven through a [`CheckoutGateway`](checkout::CheckoutGateway)
//! - **Derived views**: memoized item count and two-decimal total price
//! - **CartStore**: a cloneable handle that owns one cart and its views
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cart::prelude::*;
//!
//! let catalog: InMemoryCatalog = [
//!     ProductRecord::new("p1", "Mug", Money::from_cents(300)),
//!     ProductRecord::new("p2", "Tea", Money::from_cents(525)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let store = CartStore::new();
//! store.add_to_cart(&ProductId::new("p1"));
//! store.add_to_cart(&ProductId::new("p1"));
//! store.add_to_cart(&ProductId::new("p2"));
//!
//! assert_eq!(store.item_count(), 3);
//! assert_eq!(store.total_price(&catalog)?, "11.25");
//!
//! let outcome = store.request_checkout(&gateway).await;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod derived;

pub use error::CartError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CartError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Cart
    pub use crate::cart::{Cart, CartSnapshot, CartStore};

    // Catalog
    pub use crate::catalog::{InMemoryCatalog, ProductCatalog, ProductRecord};

    // Checkout
    pub use crate::checkout::{
        CheckoutFailure, CheckoutGateway, CheckoutOutcome, CheckoutPhase, CheckoutRequest,
        CheckoutResponse, CheckoutStatus, GatewayError,
    };

    // Config
    pub use crate::config::{CheckoutConfig, StoreConfig};

    // Derived views
    pub use crate::derived::{DerivedViews, ViewStats};
}
