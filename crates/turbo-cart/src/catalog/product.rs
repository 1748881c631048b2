//! Product records and the catalog lookup seam.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::Money;

/// A product as seen by the cart. Never mutated by the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRecord {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unit price.
    pub price: Money,
}

impl ProductRecord {
    /// Create a new product record.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Read-only product lookup used by the derived views.
pub trait ProductCatalog {
    /// Look up a product by id.
    fn get(&self, id: &ProductId) -> Option<&ProductRecord>;

    /// Version of the product set. Must change whenever any record changes.
    fn version(&self) -> u64;
}

/// Versions are drawn from one process-wide sequence, so two catalogs never
/// report the same version.
fn next_version() -> u64 {
    static VERSION: AtomicU64 = AtomicU64::new(1);
    VERSION.fetch_add(1, Ordering::Relaxed)
}

/// HashMap-backed catalog.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, ProductRecord>,
    version: u64,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
            version: next_version(),
        }
    }

    /// Insert or replace a product.
    pub fn insert(&mut self, product: ProductRecord) -> Option<ProductRecord> {
        self.version = next_version();
        self.products.insert(product.id.clone(), product)
    }

    /// Remove a product.
    pub fn remove(&mut self, id: &ProductId) -> Option<ProductRecord> {
        let removed = self.products.remove(id);
        if removed.is_some() {
            self.version = next_version();
        }
        removed
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ProductRecord> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().map(|p| (p.id.clone(), p)).collect(),
            version: next_version(),
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn get(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.products.get(id)
    }

    fn version(&self) -> u64 {
        self.version
    }
}
