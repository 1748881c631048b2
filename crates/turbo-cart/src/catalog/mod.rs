//! Product catalog module.
//!
//! The catalog is an external, read-only collaborator. The cart only needs a
//! price lookup and a version counter for memoization.

mod product;

pub use product::{InMemoryCatalog, ProductCatalog, ProductRecord};
