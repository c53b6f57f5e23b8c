//! Order commands.

use std::collections::BTreeSet;

use common::{AccountId, ProductId};

use super::{OrderError, RequestedItem, quantity_in_range};

/// Command to place a new order for an account.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The account placing the order.
    pub account_id: AccountId,

    /// Products and quantities, in the order they should appear on the order.
    pub items: Vec<RequestedItem>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command.
    pub fn new(account_id: impl Into<AccountId>, items: Vec<RequestedItem>) -> Self {
        Self {
            account_id: account_id.into(),
            items,
        }
    }

    /// Checks the request shape without contacting any other service.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.account_id.is_blank() {
            return Err(OrderError::AccountIdRequired);
        }
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for item in &self.items {
            if item.product_id.is_blank() {
                return Err(OrderError::ProductIdRequired);
            }
            if !quantity_in_range(item.quantity) {
                return Err(OrderError::InvalidQuantity {
                    product_id: item.product_id.to_string(),
                    quantity: item.quantity,
                });
            }
        }
        Ok(())
    }

    /// Returns each requested product ID once.
    pub fn distinct_product_ids(&self) -> BTreeSet<ProductId> {
        self.items.iter().map(|i| i.product_id.clone()).collect()
    }
}
