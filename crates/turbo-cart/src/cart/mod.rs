//! Shopping cart module.
//!
//! Contains the cart state container and the shared store handle that runs
//! the checkout workflow and owns the derived views.

mod cart;
mod store;

pub use cart::{Cart, CartSnapshot};
pub use store::CartStore;
