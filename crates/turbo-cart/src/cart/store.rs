//! Shared cart handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::cart::{Cart, CartSnapshot};
use crate::catalog::ProductCatalog;
use crate::checkout::{
    call_gateway, CheckoutGateway, CheckoutOutcome, CheckoutPhase, CheckoutStatus, GatewayError,
};
use crate::config::StoreConfig;
use crate::derived::{DerivedViews, ViewStats};
use crate::error::CartError;
use crate::ids::{CheckoutId, ProductId};
use crate::money::Money;

struct StoreInner {
    cart: Cart,
    views: DerivedViews,
}

/// Cloneable handle to one cart and its memoized views.
///
/// Collaborators receive a clone of the handle instead of reaching for a
/// global. Every method runs a short synchronous critical section; the lock
/// is never held across the checkout await, so edits made while a checkout
/// is loading apply immediately.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Mutex<StoreInner>>,
    checkout_timeout: Option<Duration>,
}

impl CartStore {
    /// Create a store with an empty cart and default configuration.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Create a store with an empty cart.
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                cart: Cart::new(),
                views: DerivedViews::new(),
            })),
            checkout_timeout: config.checkout.timeout(),
        }
    }

    // Critical sections cannot panic halfway through a transition, so a
    // poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add one unit of a product.
    pub fn add_to_cart(&self, product_id: &ProductId) {
        self.lock().cart.add_to_cart(product_id);
    }

    /// Remove a line item; no-op when absent.
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        self.lock().cart.remove_from_cart(product_id);
    }

    /// Set a line item's quantity; `<= 0` removes it.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        self.lock().cart.update_quantity(product_id, quantity);
    }

    /// Submit the current cart to the gateway and fold the outcome into the
    /// cart's checkout status.
    ///
    /// Never fails: rejections and transport errors end in the error phase
    /// with the items kept. If a checkout is already loading nothing is sent.
    ///
    /// Dropping the returned future before the gateway answers fails the
    /// attempt with [`GatewayError::Abandoned`], so the cart never stays
    /// loading.
    #[instrument(skip_all)]
    pub async fn request_checkout<G>(&self, gateway: &G) -> CheckoutOutcome
    where
        G: CheckoutGateway + ?Sized,
    {
        let Some(request) = self.lock().cart.begin_checkout() else {
            return CheckoutOutcome::AlreadyInFlight;
        };
        let pending = PendingCheckout {
            store: self,
            id: Some(request.id.clone()),
        };

        let result = call_gateway(gateway, &request, self.checkout_timeout).await;

        // Disarm before locking; the guard locks on drop.
        pending.settle();
        let mut inner = self.lock();
        match result {
            Ok(response) => {
                inner.cart.complete_checkout(&request.id, response);
                if response.success {
                    CheckoutOutcome::Completed
                } else {
                    CheckoutOutcome::Rejected
                }
            }
            Err(error) => {
                inner.cart.fail_checkout(&request.id, &error);
                CheckoutOutcome::Failed {
                    message: error.message(),
                }
            }
        }
    }

    /// Quantity of a product, 0 when absent.
    pub fn quantity(&self, product_id: &ProductId) -> u64 {
        self.lock().cart.quantity(product_id)
    }

    /// Copy of items, checkout state and error message.
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().cart.snapshot()
    }

    /// Current checkout status.
    pub fn checkout_status(&self) -> CheckoutStatus {
        self.lock().cart.checkout_status().clone()
    }

    /// Flat checkout phase.
    pub fn checkout_phase(&self) -> CheckoutPhase {
        self.lock().cart.checkout_phase()
    }

    /// Error message of the last failed checkout, empty otherwise.
    pub fn error_message(&self) -> String {
        self.lock().cart.error_message().to_string()
    }

    /// Memoized item count.
    pub fn item_count(&self) -> u64 {
        let mut inner = self.lock();
        let StoreInner { cart, views } = &mut *inner;
        views.item_count(cart)
    }

    /// Memoized exact total.
    pub fn total<C>(&self, catalog: &C) -> Result<Money, CartError>
    where
        C: ProductCatalog + ?Sized,
    {
        let mut inner = self.lock();
        let StoreInner { cart, views } = &mut *inner;
        views.total(cart, catalog)
    }

    /// Memoized total formatted with two decimals.
    pub fn total_price<C>(&self, catalog: &C) -> Result<String, CartError>
    where
        C: ProductCatalog + ?Sized,
    {
        let price = self.total(catalog).and_then(|total| total.try_display_amount());
        debug!(?price, "total price read");
        price
    }

    /// Recomputation counters of the derived views.
    pub fn view_stats(&self) -> ViewStats {
        self.lock().views.stats()
    }
}

/// Fails the in-flight attempt if the checkout future is dropped mid-call.
struct PendingCheckout<'a> {
    store: &'a CartStore,
    id: Option<CheckoutId>,
}

impl PendingCheckout<'_> {
    fn settle(mut self) {
        self.id = None;
    }
}

impl Drop for PendingCheckout<'_> {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if self.store.lock().cart.fail_checkout(&id, &GatewayError::Abandoned) {
            warn!(checkout_id = %id, "checkout future dropped before the gateway answered");
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.snapshot())
            .field("checkout_timeout", &self.checkout_timeout)
            .finish()
    }
}
