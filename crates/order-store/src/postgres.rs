use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{AccountId, OrderId, ProductId};
use futures_util::TryStreamExt;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    JoinedRow, LineItemRecord, OrderGrouper, OrderRecord, OrderStoreError, Result,
    repository::{OrderRepository, validate_record},
};

const FIND_BY_ACCOUNT_SQL: &str = r#"
    SELECT o.id, o.created_at, o.account_id, o.total_price,
           op.product_id, op.quantity, op.name, op.description, op.price
    FROM orders o
    JOIN order_products op ON o.id = op.order_id
    WHERE o.account_id = $1
    ORDER BY o.id ASC, op.position ASC
"#;

/// PostgreSQL-backed order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_joined(row: PgRow) -> Result<JoinedRow> {
        let order_id = OrderId::from_uuid(row.try_get::<Uuid, _>("id")?);
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| OrderStoreError::CorruptRow {
            order_id,
            reason: format!("negative quantity {quantity}"),
        })?;

        Ok(JoinedRow {
            order_id,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            account_id: AccountId::new(row.try_get::<String, _>("account_id")?),
            total_price_cents: row.try_get("total_price")?,
            product: LineItemRecord {
                product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
                quantity,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                price_cents: row.try_get("price")?,
            },
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id, account_id = %order.account_id))]
    async fn save(&self, order: &OrderRecord) -> Result<()> {
        validate_record(order)?;

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, created_at, account_id, total_price)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.created_at)
        .bind(order.account_id.as_str())
        .bind(order.total_price_cents)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("orders_pkey")
            {
                return OrderStoreError::DuplicateOrder(order.id);
            }
            OrderStoreError::Database(e)
        })?;

        for (position, product) in order.products.iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| OrderStoreError::InvalidRecord {
                order_id: order.id,
                reason: "too many line items".to_string(),
            })?;
            let quantity =
                i32::try_from(product.quantity).map_err(|_| OrderStoreError::InvalidRecord {
                    order_id: order.id,
                    reason: format!("quantity {} out of range", product.quantity),
                })?;

            sqlx::query(
                r#"
                INSERT INTO order_products (order_id, position, product_id, quantity, name, description, price)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(position)
            .bind(product.product_id.as_str())
            .bind(quantity)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price_cents)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, %position, "line item insert failed, rolling back");
                OrderStoreError::Database(e)
            })?;
        }

        tx.commit().await?;
        metrics::counter!("order_store_orders_saved_total").increment(1);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_account(&self, account_id: &AccountId) -> Result<Vec<OrderRecord>> {
        let mut rows = sqlx::query(FIND_BY_ACCOUNT_SQL)
            .bind(account_id.as_str())
            .fetch(&self.pool);

        let mut grouper = OrderGrouper::new();
        while let Some(row) = rows.try_next().await? {
            grouper.push(Self::row_to_joined(row)?);
        }

        let orders = grouper.finish();
        tracing::debug!(count = orders.len(), "orders loaded");
        Ok(orders)
    }
}
