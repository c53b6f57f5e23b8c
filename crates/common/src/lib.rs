//! Shared identifier types for the order composition system.

mod types;

pub use types::{AccountId, OrderId, ProductId};
