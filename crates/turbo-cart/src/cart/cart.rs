//! Cart state and its transitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::checkout::{
    CheckoutFailure, CheckoutPhase, CheckoutRequest, CheckoutResponse, CheckoutStatus, GatewayError,
};
use crate::ids::{CheckoutId, ProductId};

/// The shopper's cart.
///
/// Line items always hold a quantity of at least one; a product with no
/// quantity is simply absent. Edits never touch the checkout status, and the
/// checkout transitions are the only way the status changes.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    /// Product id -> quantity (>= 1).
    items: BTreeMap<ProductId, u64>,
    /// Advances on every change to `items`.
    items_version: u64,
    /// Checkout lifecycle.
    checkout: CheckoutStatus,
}

impl Cart {
    /// Create an empty cart, ready for checkout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product.
    pub fn add_to_cart(&mut self, product_id: &ProductId) {
        let quantity = self.items.entry(product_id.clone()).or_insert(0);
        *quantity = quantity.saturating_add(1);
        debug!(product_id = %product_id, quantity = *quantity, "added to cart");
        self.touch();
    }

    /// Remove a line item regardless of its quantity.
    ///
    /// Returns false (and changes nothing) if the product was not in the cart.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        let removed = self.items.remove(product_id).is_some();
        if removed {
            debug!(product_id = %product_id, "removed from cart");
            self.touch();
        }
        removed
    }

    /// Set a line item's quantity.
    ///
    /// Inserts the line if absent. A quantity <= 0 removes the line.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }

        let quantity = quantity as u64;
        if self.items.get(product_id) == Some(&quantity) {
            return;
        }
        self.items.insert(product_id.clone(), quantity);
        debug!(product_id = %product_id, quantity, "updated quantity");
        self.touch();
    }

    /// Quantity of a product, 0 when absent.
    pub fn quantity(&self, product_id: &ProductId) -> u64 {
        self.items.get(product_id).copied().unwrap_or(0)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains_key(product_id)
    }

    /// Line items ordered by product id.
    pub fn items(&self) -> &BTreeMap<ProductId, u64> {
        &self.items
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Version of `items`; changes whenever `items` does.
    pub fn items_version(&self) -> u64 {
        self.items_version
    }

    /// Current checkout status.
    pub fn checkout_status(&self) -> &CheckoutStatus {
        &self.checkout
    }

    /// Flat checkout phase.
    pub fn checkout_phase(&self) -> CheckoutPhase {
        self.checkout.phase()
    }

    /// Error message of the last failed checkout, empty otherwise.
    pub fn error_message(&self) -> &str {
        self.checkout.error_message()
    }

    /// Copy of the raw read surface.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            checkout_state: self.checkout_phase(),
            error_message: self.error_message().to_string(),
        }
    }

    /// Start a checkout attempt.
    ///
    /// Captures the current items as the request payload and moves to
    /// loading. Returns `None` if an attempt is already in flight.
    pub fn begin_checkout(&mut self) -> Option<CheckoutRequest> {
        if let Some(id) = self.checkout.in_flight_id() {
            warn!(checkout_id = %id, "checkout already in flight");
            return None;
        }

        let request = CheckoutRequest::new(self.items.clone());
        info!(
            checkout_id = %request.id,
            lines = request.items.len(),
            units = request.unit_count(),
            "checkout started"
        );
        self.checkout = CheckoutStatus::InFlight {
            request: request.clone(),
        };
        Some(request)
    }

    /// Apply a normal gateway response to the attempt `id`.
    ///
    /// On acceptance the cart is emptied and the status returns to ready in
    /// the same call. Returns false if `id` is not the attempt in flight.
    pub fn complete_checkout(&mut self, id: &CheckoutId, response: CheckoutResponse) -> bool {
        if !self.is_current(id) {
            return false;
        }

        if response.success {
            info!(checkout_id = %id, "checkout completed");
            self.items.clear();
            self.touch();
            self.checkout = CheckoutStatus::Idle;
        } else {
            warn!(checkout_id = %id, "checkout rejected");
            self.checkout = CheckoutStatus::Failed(CheckoutFailure::Rejected);
        }
        true
    }

    /// Apply a transport failure to the attempt `id`. Items are kept.
    ///
    /// Returns false if `id` is not the attempt in flight.
    pub fn fail_checkout(&mut self, id: &CheckoutId, error: &GatewayError) -> bool {
        if !self.is_current(id) {
            return false;
        }

        let message = error.message();
        warn!(checkout_id = %id, error = %message, "checkout failed");
        self.checkout = CheckoutStatus::Failed(CheckoutFailure::Transport { message });
        true
    }

    fn is_current(&self, id: &CheckoutId) -> bool {
        match self.checkout.in_flight_id() {
            Some(current) if current == id => true,
            current => {
                warn!(
                    checkout_id = %id,
                    in_flight = ?current.map(CheckoutId::as_str),
                    "ignoring stale checkout resolution"
                );
                false
            }
        }
    }

    fn touch(&mut self) {
        self.items_version = self.items_version.wrapping_add(1);
    }
}

/// Serializable copy of the cart's raw state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: BTreeMap<ProductId, u64>,
    pub checkout_state: CheckoutPhase,
    pub error_message: String,
}
