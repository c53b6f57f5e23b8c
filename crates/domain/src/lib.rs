//! Domain layer for order placement and retrieval.
//!
//! This crate provides:
//! - The immutable `Order` aggregate with its priced line items
//! - The catalog lookup port used to price orders
//! - `OrderService`, which owns order invariants and drives persistence

pub mod catalog;
pub mod error;
pub mod order;

pub use catalog::{CatalogError, CatalogProduct, CatalogService, InMemoryCatalogService};
pub use common::{AccountId, OrderId, ProductId};
pub use error::DomainError;
pub use order::{
    DEFAULT_CATALOG_TIMEOUT, Money, Order, OrderError, OrderService, OrderedProduct, PlaceOrder,
    RequestedItem,
};
