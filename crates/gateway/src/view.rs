//! Presentation shapes returned to clients.

use chrono::{DateTime, Utc};
use common::{AccountId, OrderId, ProductId};
use domain::{Order, OrderedProduct};
use serde::Serialize;

use crate::account::Account;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub name: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
        }
    }
}

/// A line item, flattened for clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: u32,
}

impl From<&OrderedProduct> for OrderedProductView {
    fn from(product: &OrderedProduct) -> Self {
        Self {
            id: product.product_id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.as_dollars_f64(),
            quantity: product.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub account_id: AccountId,
    pub total_price: f64,
    pub products: Vec<OrderedProductView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            created_at: order.created_at(),
            account_id: order.account_id().clone(),
            total_price: order.total_price().as_dollars_f64(),
            products: order.products().iter().map(OrderedProductView::from).collect(),
        }
    }
}
