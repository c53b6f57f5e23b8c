use async_trait::async_trait;
use common::AccountId;

use crate::{OrderRecord, OrderStoreError, Result};

/// Core trait for order persistence.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order and all of its line items.
    ///
    /// The write is atomic: readers observe either the whole order or
    /// nothing. On failure nothing is kept and the error is returned.
    async fn save(&self, order: &OrderRecord) -> Result<()>;

    /// Retrieves every order placed by an account, with line items.
    ///
    /// Orders are returned by ID ascending and line items in the order they
    /// were placed. An account without orders yields an empty vector.
    async fn find_by_account(&self, account_id: &AccountId) -> Result<Vec<OrderRecord>>;
}

/// Largest line-item quantity the schema can store (`INTEGER` column).
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// Checks a record against the persisted schema before writing.
pub fn validate_record(order: &OrderRecord) -> Result<()> {
    let invalid = |reason: &str| OrderStoreError::InvalidRecord {
        order_id: order.id,
        reason: reason.to_string(),
    };

    if order.account_id.is_blank() {
        return Err(invalid("account ID is empty"));
    }
    if order.products.is_empty() {
        return Err(invalid("order has no line items"));
    }
    if order.products.iter().any(|p| p.quantity == 0) {
        return Err(invalid("line item quantity must be greater than 0"));
    }
    if order.products.iter().any(|p| p.quantity > MAX_QUANTITY) {
        return Err(invalid("line item quantity exceeds the storable maximum"));
    }

    Ok(())
}
