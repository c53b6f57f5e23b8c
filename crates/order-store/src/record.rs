//! Persisted shapes of an order and its line items.

use chrono::{DateTime, Utc};
use common::{AccountId, OrderId, ProductId};

/// One row of `order_products`: a line item with the catalog data copied at
/// order time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemRecord {
    pub product_id: ProductId,
    pub quantity: u32,
    pub name: String,
    pub description: String,
    /// Unit price in cents.
    pub price_cents: i64,
}

/// An order row together with all of its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub account_id: AccountId,
    /// Total price in cents.
    pub total_price_cents: i64,
    pub products: Vec<LineItemRecord>,
}

/// One row of the `orders ⋈ order_products` join.
///
/// The order's scalar columns are repeated on every row next to a single
/// line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
    pub account_id: AccountId,
    pub total_price_cents: i64,
    pub product: LineItemRecord,
}

impl JoinedRow {
    /// Starts a new order record holding only this row's line item.
    pub(crate) fn into_order(self) -> OrderRecord {
        OrderRecord {
            id: self.order_id,
            created_at: self.created_at,
            account_id: self.account_id,
            total_price_cents: self.total_price_cents,
            products: vec![self.product],
        }
    }
}

impl OrderRecord {
    /// Flattens the record into the rows the join query would return.
    pub fn joined_rows(&self) -> impl Iterator<Item = JoinedRow> + '_ {
        self.products.iter().map(|product| JoinedRow {
            order_id: self.id,
            created_at: self.created_at,
            account_id: self.account_id.clone(),
            total_price_cents: self.total_price_cents,
            product: product.clone(),
        })
    }
}
