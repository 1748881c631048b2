//! Item count and total price projections.

use std::collections::BTreeMap;

use tracing::trace;

use crate::cart::Cart;
use crate::catalog::ProductCatalog;
use crate::derived::Memo;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;

/// Sum of all quantities; 0 for an empty cart.
pub fn count_items(items: &BTreeMap<ProductId, u64>) -> u64 {
    items.values().fold(0u64, |acc, q| acc.saturating_add(*q))
}

/// Sum of `price * quantity` over all line items.
///
/// Fails with [`CartError::ProductNotFound`] on the first line item whose
/// product is missing from the catalog, and with [`CartError::Overflow`] when
/// the total cannot be represented at display precision.
pub fn compute_total<C>(items: &BTreeMap<ProductId, u64>, catalog: &C) -> Result<Money, CartError>
where
    C: ProductCatalog + ?Sized,
{
    let total = items.iter().try_fold(Money::ZERO, |total, (id, quantity)| {
        let product = catalog
            .get(id)
            .ok_or_else(|| CartError::ProductNotFound(id.clone()))?;
        let line = product
            .price
            .try_multiply(*quantity)
            .ok_or(CartError::Overflow)?;
        total.try_add(&line).ok_or(CartError::Overflow)
    })?;

    // Too many integer digits to format with two decimals.
    total.try_rounded().ok_or(CartError::Overflow)?;
    Ok(total)
}

/// Recomputation counters, for observing memoization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewStats {
    pub item_count_recomputations: u64,
    pub total_recomputations: u64,
}

/// Memoized projections for one cart.
///
/// Keys are the cart's items version and the catalog version, so a views
/// instance must stay paired with the same cart.
#[derive(Debug, Clone, Default)]
pub struct DerivedViews {
    item_count: Memo<u64, u64>,
    total: Memo<(u64, u64), Result<Money, CartError>>,
}

impl DerivedViews {
    /// Create views with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized item count.
    pub fn item_count(&mut self, cart: &Cart) -> u64 {
        self.item_count.get_or_compute(cart.items_version(), || {
            trace!(version = cart.items_version(), "recomputing item count");
            count_items(cart.items())
        })
    }

    /// Memoized exact total.
    pub fn total<C>(&mut self, cart: &Cart, catalog: &C) -> Result<Money, CartError>
    where
        C: ProductCatalog + ?Sized,
    {
        let key = (cart.items_version(), catalog.version());
        self.total.get_or_compute(key, || {
            trace!(
                items_version = key.0,
                catalog_version = key.1,
                "recomputing cart total"
            );
            compute_total(cart.items(), catalog)
        })
    }

    /// Memoized total formatted with two decimals, e.g. `"11.25"`.
    pub fn total_price<C>(&mut self, cart: &Cart, catalog: &C) -> Result<String, CartError>
    where
        C: ProductCatalog + ?Sized,
    {
        self.total(cart, catalog).and_then(|total| total.try_display_amount())
    }

    /// Recomputation counters.
    pub fn stats(&self) -> ViewStats {
        ViewStats {
            item_count_recomputations: self.item_count.recomputations(),
            total_recomputations: self.total.recomputations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, ProductRecord};

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    fn catalog(prices: &[(&str, &str)]) -> InMemoryCatalog {
        prices
            .iter()
            .map(|(id, price)| ProductRecord::new(*id, *id, Money::parse(price).unwrap()))
            .collect()
    }

    fn cart_with(lines: &[(&str, i64)]) -> Cart {
        let mut cart = Cart::new();
        for (id, quantity) in lines {
            cart.update_quantity(&pid(id), *quantity);
        }
        cart
    }

    #[test]
    fn test_item_count() {
        let mut views = DerivedViews::new();
        assert_eq!(views.item_count(&Cart::new()), 0);

        let cart = cart_with(&[("p1", 2), ("p2", 1)]);
        let mut views = DerivedViews::new();
        assert_eq!(views.item_count(&cart), 3);
    }

    #[test]
    fn test_total_price() {
        let cart = cart_with(&[("p1", 2), ("p2", 1)]);
        let catalog = catalog(&[("p1", "3.00"), ("p2", "5.25")]);
        let mut views = DerivedViews::new();

        assert_eq!(views.total_price(&cart, &catalog).unwrap(), "11.25");
    }

    #[test]
    fn test_total_price_empty_cart() {
        let catalog = catalog(&[]);
        let mut views = DerivedViews::new();
        assert_eq!(views.total_price(&Cart::new(), &catalog).unwrap(), "0.00");
    }

    #[test]
    fn test_total_price_rounding_boundary() {
        // 2 x 1.0025 = 2.005 exactly; ties round away from zero.
        let cart = cart_with(&[("p1", 2)]);
        let mut views = DerivedViews::new();
        assert_eq!(
            views.total_price(&cart, &catalog(&[("p1", "1.0025")])).unwrap(),
            "2.01"
        );

        let mut views = DerivedViews::new();
        assert_eq!(
            views.total_price(&cart, &catalog(&[("p1", "1.00245")])).unwrap(),
            "2.00"
        );
    }

    #[test]
    fn test_total_too_large_to_display_overflows() {
        let cart = cart_with(&[("p1", i64::MAX)]);
        let catalog = catalog(&[("p1", "500000000")]);
        let mut views = DerivedViews::new();

        assert_eq!(views.total(&cart, &catalog), Err(CartError::Overflow));
        assert_eq!(views.total_price(&cart, &catalog), Err(CartError::Overflow));
    }

    #[test]
    fn test_missing_product_fails_total() {
        let cart = cart_with(&[("p1", 1), ("ghost", 2)]);
        let catalog = catalog(&[("p1", "3.00")]);
        let mut views = DerivedViews::new();

        assert_eq!(
            views.total_price(&cart, &catalog),
            Err(CartError::ProductNotFound(pid("ghost")))
        );
        // Item count does not depend on the catalog.
        assert_eq!(views.item_count(&cart), 3);
    }

    #[test]
    fn test_missing_product_recovers_when_catalog_changes() {
        let cart = cart_with(&[("ghost", 2)]);
        let mut catalog = catalog(&[]);
        let mut views = DerivedViews::new();

        assert!(views.total_price(&cart, &catalog).is_err());
        catalog.insert(ProductRecord::new("ghost", "Ghost", Money::from_cents(150)));
        assert_eq!(views.total_price(&cart, &catalog).unwrap(), "3.00");
    }

    #[test]
    fn test_total_is_memoized() {
        let mut cart = cart_with(&[("p1", 2), ("p2", 1)]);
        let mut catalog = catalog(&[("p1", "3.00"), ("p2", "5.25")]);
        let mut views = DerivedViews::new();

        views.total_price(&cart, &catalog).unwrap();
        views.total_price(&cart, &catalog).unwrap();
        assert_eq!(views.stats().total_recomputations, 1);

        cart.add_to_cart(&pid("p2"));
        assert_eq!(views.total_price(&cart, &catalog).unwrap(), "16.50");
        assert_eq!(views.stats().total_recomputations, 2);

        catalog.insert(ProductRecord::new("p1", "p1", Money::from_cents(100)));
        assert_eq!(views.total_price(&cart, &catalog).unwrap(), "12.50");
        assert_eq!(views.stats().total_recomputations, 3);

        views.total_price(&cart, &catalog).unwrap();
        assert_eq!(views.stats().total_recomputations, 3);
    }

    #[test]
    fn test_item_count_is_memoized() {
        let mut cart = cart_with(&[("p1", 2)]);
        let mut views = DerivedViews::new();

        views.item_count(&cart);
        views.item_count(&cart);
        assert_eq!(views.stats().item_count_recomputations, 1);

        // A no-op removal does not invalidate.
        cart.remove_from_cart(&pid("missing"));
        views.item_count(&cart);
        assert_eq!(views.stats().item_count_recomputations, 1);

        cart.add_to_cart(&pid("p1"));
        assert_eq!(views.item_count(&cart), 3);
        assert_eq!(views.stats().item_count_recomputations, 2);
    }

    #[test]
    fn test_item_count_ignores_catalog_changes() {
        let cart = cart_with(&[("p1", 2)]);
        let mut catalog = catalog(&[("p1", "3.00")]);
        let mut views = DerivedViews::new();

        views.item_count(&cart);
        views.total(&cart, &catalog).unwrap();
        catalog.insert(ProductRecord::new("p9", "p9", Money::from_cents(1)));
        views.item_count(&cart);
        views.total(&cart, &catalog).unwrap();

        let stats = views.stats();
        assert_eq!(stats.item_count_recomputations, 1);
        assert_eq!(stats.total_recomputations, 2);
    }
}
