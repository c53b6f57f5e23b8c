//! Order aggregate implementation.

use chrono::{DateTime, SubsecRound, Utc};
use common::{AccountId, OrderId};
use order_store::{LineItemRecord, OrderRecord};

use super::{Money, OrderError, OrderedProduct, quantity_in_range};

/// Order aggregate root.
///
/// An order is created once, fully priced, and never modified afterwards.
/// The total is derived from the line items when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    created_at: DateTime<Utc>,
    account_id: AccountId,
    total_price: Money,
    products: Vec<OrderedProduct>,
}

impl Order {
    /// Creates a new order with a fresh ID and the current time.
    ///
    /// Fails if there are no line items, a quantity is out of range, or the
    /// total does not fit.
    pub fn place(account_id: AccountId, products: Vec<OrderedProduct>) -> Result<Self, OrderError> {
        if account_id.is_blank() {
            return Err(OrderError::AccountIdRequired);
        }
        if products.is_empty() {
            return Err(OrderError::NoItems);
        }
        if let Some(item) = products.iter().find(|p| !quantity_in_range(p.quantity)) {
            return Err(OrderError::InvalidQuantity {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
            });
        }

        let total_price = products
            .iter()
            .try_fold(Money::zero(), |total, p| {
                p.line_total().and_then(|line| total.checked_add(line))
            })
            .ok_or(OrderError::TotalOutOfRange)?;

        Ok(Self {
            id: OrderId::new(),
            // Stored timestamps keep microsecond precision.
            created_at: Utc::now().trunc_subsecs(6),
            account_id,
            total_price,
            products,
        })
    }

    /// Rebuilds an order from its persisted record.
    pub fn from_record(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            account_id: record.account_id,
            total_price: Money::from_cents(record.total_price_cents),
            products: record
                .products
                .into_iter()
                .map(|p| OrderedProduct {
                    product_id: p.product_id,
                    name: p.name,
                    description: p.description,
                    price: Money::from_cents(p.price_cents),
                    quantity: p.quantity,
                })
                .collect(),
        }
    }

    /// Converts the order into its persisted record.
    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id,
            created_at: self.created_at,
            account_id: self.account_id.clone(),
            total_price_cents: self.total_price.cents(),
            products: self
                .products
                .iter()
                .map(|p| LineItemRecord {
                    product_id: p.product_id.clone(),
                    quantity: p.quantity,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    price_cents: p.price.cents(),
                })
                .collect(),
        }
    }
}

// Query methods
impl Order {
    /// Returns the order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns when the order was placed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the account that placed the order.
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Returns the total price.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the line items in the order they were requested.
    pub fn products(&self) -> &[OrderedProduct] {
        &self.products
    }
}
