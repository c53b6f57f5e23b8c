//! Order aggregate and related types.

mod aggregate;
mod commands;
mod service;
mod value_objects;

pub use aggregate::Order;
pub use commands::PlaceOrder;
pub use service::{DEFAULT_CATALOG_TIMEOUT, OrderService};
pub use value_objects::{Money, OrderedProduct, RequestedItem};

use order_store::MAX_QUANTITY;
use thiserror::Error;

/// Errors raised when an order request is malformed.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Account ID is required.
    #[error("Account ID is required")]
    AccountIdRequired,

    /// Every line item needs a product ID.
    #[error("Product ID is required")]
    ProductIdRequired,

    /// Quantity outside `1..=MAX_QUANTITY`.
    #[error(
        "Invalid quantity for {product_id}: {quantity} (must be between 1 and {max})",
        max = MAX_QUANTITY
    )]
    InvalidQuantity { product_id: String, quantity: u32 },

    /// The order total does not fit in the money representation.
    #[error("Order total is out of range")]
    TotalOutOfRange,

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,
}

/// True if a line-item quantity can be ordered and stored.
pub(crate) fn quantity_in_range(quantity: u32) -> bool {
    (1..=MAX_QUANTITY).contains(&quantity)
}
