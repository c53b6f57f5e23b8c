use common::OrderId;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// An order with the same ID has already been saved.
    #[error("Order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// The record violates the persisted schema and was not written.
    #[error("Invalid order record {order_id}: {reason}")]
    InvalidRecord { order_id: OrderId, reason: String },

    /// A stored row could not be mapped back into a record.
    #[error("Corrupt row for order {order_id}: {reason}")]
    CorruptRow { order_id: OrderId, reason: String },

    /// Writing a line item failed; the whole order was rolled back.
    #[error("Failed to write line items for order {order_id}: {reason}")]
    LineItemWrite { order_id: OrderId, reason: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
