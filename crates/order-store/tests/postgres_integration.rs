//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency. Every test
//! works on its own freshly generated account, so they can run in parallel.
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration
//! ```

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use order_store::{
    AccountId, LineItemRecord, OrderId, OrderRecord, OrderRepository, OrderStoreError,
    PostgresOrderRepository, ProductId,
};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Product ID that the fault-injection trigger refuses to insert.
const FAULTY_PRODUCT: &str = "FAULT-INJECTED";

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresOrderRepository::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();

            // Simulated fault: line-item inserts for one product ID raise an error
            // after the order row has already been written in the same transaction.
            sqlx::raw_sql(&format!(
                r#"
                CREATE OR REPLACE FUNCTION reject_faulty_line_item() RETURNS trigger AS $$
                BEGIN
                    IF NEW.product_id = '{FAULTY_PRODUCT}' THEN
                        RAISE EXCEPTION 'injected line item failure';
                    END IF;
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TRIGGER reject_faulty_line_item
                BEFORE INSERT ON order_products
                FOR EACH ROW EXECUTE FUNCTION reject_faulty_line_item();
                "#
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_repository() -> PostgresOrderRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    PostgresOrderRepository::new(pool)
}

fn line(product: &str, quantity: u32, price_cents: i64) -> LineItemRecord {
    LineItemRecord {
        product_id: ProductId::new(product),
        quantity,
        name: format!("{product} name"),
        description: format!("{product} description"),
        price_cents,
    }
}

fn create_test_order(account_id: &AccountId, products: Vec<LineItemRecord>) -> OrderRecord {
    let total_price_cents = products
        .iter()
        .map(|p| p.price_cents * i64::from(p.quantity))
        .sum();
    OrderRecord {
        id: OrderId::new(),
        // TIMESTAMPTZ keeps microseconds
        created_at: Utc::now().trunc_subsecs(6),
        account_id: account_id.clone(),
        total_price_cents,
        products,
    }
}

async fn order_row_exists(repo: &PostgresOrderRepository, id: OrderId) -> bool {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = $1")
        .bind(id.as_uuid())
        .fetch_one(repo.pool())
        .await
        .unwrap();
    count > 0
}

#[tokio::test]
async fn save_and_find_round_trip() {
    let repo = get_test_repository().await;
    let account_id = AccountId::generate();
    let order = create_test_order(
        &account_id,
        vec![line("SKU-001", 2, 1999), line("SKU-002", 1, 500)],
    );

    repo.save(&order).await.unwrap();

    let found = repo.find_by_account(&account_id).await.unwrap();
    assert_eq!(found, vec![order]);
}

#[tokio::test]
async fn account_without_orders_returns_empty() {
    let repo = get_test_repository().await;

    let found = repo
        .find_by_account(&AccountId::generate())
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn multiple_orders_grouped_and_sorted() {
    let repo = get_test_repository().await;
    let account_id = AccountId::generate();
    let first = create_test_order(&account_id, vec![line("A", 1, 100), line("B", 2, 200)]);
    let second = create_test_order(&account_id, vec![line("C", 3, 300)]);
    let third = create_test_order(
        &account_id,
        vec![line("D", 1, 100), line("E", 1, 100), line("F", 1, 100)],
    );

    repo.save(&third).await.unwrap();
    repo.save(&first).await.unwrap();
    repo.save(&second).await.unwrap();

    let found = repo.find_by_account(&account_id).await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[0], first);
    assert_eq!(found[1], second);
    assert_eq!(found[2], third);
}

#[tokio::test]
async fn orders_of_other_accounts_are_not_returned() {
    let repo = get_test_repository().await;
    let mine = AccountId::generate();
    let theirs = AccountId::generate();

    repo.save(&create_test_order(&mine, vec![line("A", 1, 100)]))
        .await
        .unwrap();
    repo.save(&create_test_order(&theirs, vec![line("B", 1, 100)]))
        .await
        .unwrap();

    let found = repo.find_by_account(&mine).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].account_id, mine);
}

#[tokio::test]
async fn failed_line_item_insert_rolls_back_order_row() {
    let repo = get_test_repository().await;
    let account_id = AccountId::generate();
    let order = create_test_order(
        &account_id,
        vec![line("SKU-001", 1, 100), line(FAULTY_PRODUCT, 1, 100)],
    );

    let result = repo.save(&order).await;

    assert!(matches!(result, Err(OrderStoreError::Database(_))));
    assert!(!order_row_exists(&repo, order.id).await);
    assert!(repo.find_by_account(&account_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_order_id_is_rejected() {
    let repo = get_test_repository().await;
    let account_id = AccountId::generate();
    let order = create_test_order(&account_id, vec![line("A", 1, 100)]);

    repo.save(&order).await.unwrap();
    let result = repo.save(&order).await;

    assert!(matches!(result, Err(OrderStoreError::DuplicateOrder(id)) if id == order.id));
    assert_eq!(repo.find_by_account(&account_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_record_is_not_written() {
    let repo = get_test_repository().await;
    let account_id = AccountId::generate();
    let order = create_test_order(&account_id, vec![]);

    let result = repo.save(&order).await;

    assert!(matches!(result, Err(OrderStoreError::InvalidRecord { .. })));
    assert!(!order_row_exists(&repo, order.id).await);
}

#[tokio::test]
async fn concurrent_saves_for_one_account() {
    let repo = get_test_repository().await;
    let account_id = AccountId::generate();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = repo.clone();
            let order = create_test_order(&account_id, vec![line(&format!("SKU-{i}"), 1, 100)]);
            tokio::spawn(async move { repo.save(&order).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let found = repo.find_by_account(&account_id).await.unwrap();
    assert_eq!(found.len(), 8);
    assert!(found.windows(2).all(|pair| pair[0].id < pair[1].id));
}
