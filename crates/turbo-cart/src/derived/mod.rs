//! Derived (memoized) views over cart state.

mod memo;
mod views;

pub use memo::Memo;
pub use views::{compute_total, count_items, DerivedViews, ViewStats};
