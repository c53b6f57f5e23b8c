use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{AccountId, OrderId};
use tokio::sync::RwLock;

use crate::{
    JoinedRow, LineItemRecord, OrderRecord, OrderStoreError, Result, group_joined_rows,
    repository::{OrderRepository, validate_record},
};

#[derive(Debug, Clone)]
struct OrderRow {
    created_at: DateTime<Utc>,
    account_id: AccountId,
    total_price_cents: i64,
}

#[derive(Debug, Clone)]
struct OrderProductRow {
    order_id: OrderId,
    position: usize,
    product: LineItemRecord,
}

#[derive(Debug, Default)]
struct Tables {
    orders: BTreeMap<OrderId, OrderRow>,
    order_products: Vec<OrderProductRow>,
    fail_line_item_writes: bool,
}

/// In-memory order repository for testing.
///
/// Mirrors the relational layout of the PostgreSQL implementation: an
/// `orders` table, an `order_products` table, and reads that go through the
/// same join-and-group path.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent line-item write fail, after the order row has
    /// been staged.
    pub async fn set_fail_line_item_writes(&self, fail: bool) {
        self.tables.write().await.fail_line_item_writes = fail;
    }

    /// Returns the number of stored order rows.
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the number of stored line-item rows.
    pub async fn line_item_count(&self) -> usize {
        self.tables.read().await.order_products.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &OrderRecord) -> Result<()> {
        validate_record(order)?;

        let mut tables = self.tables.write().await;

        if tables.orders.contains_key(&order.id) {
            return Err(OrderStoreError::DuplicateOrder(order.id));
        }

        // Stage both tables and only apply them once every row is accepted.
        let order_row = OrderRow {
            created_at: order.created_at,
            account_id: order.account_id.clone(),
            total_price_cents: order.total_price_cents,
        };

        let mut staged = Vec::with_capacity(order.products.len());
        for (position, product) in order.products.iter().enumerate() {
            if tables.fail_line_item_writes {
                return Err(OrderStoreError::LineItemWrite {
                    order_id: order.id,
                    reason: format!("injected failure at position {position}"),
                });
            }
            staged.push(OrderProductRow {
                order_id: order.id,
                position,
                product: product.clone(),
            });
        }

        tables.orders.insert(order.id, order_row);
        tables.order_products.extend(staged);
        Ok(())
    }

    async fn find_by_account(&self, account_id: &AccountId) -> Result<Vec<OrderRecord>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<(OrderId, usize, JoinedRow)> = tables
            .order_products
            .iter()
            .filter_map(|line| {
                let order = tables.orders.get(&line.order_id)?;
                (&order.account_id == account_id).then(|| {
                    let row = JoinedRow {
                        order_id: line.order_id,
                        created_at: order.created_at,
                        account_id: order.account_id.clone(),
                        total_price_cents: order.total_price_cents,
                        product: line.product.clone(),
                    };
                    (line.order_id, line.position, row)
                })
            })
            .collect();
        rows.sort_by_key(|(order_id, position, _)| (*order_id, *position));

        Ok(group_joined_rows(rows.into_iter().map(|(_, _, row)| row)))
    }
}
