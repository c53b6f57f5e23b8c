//! Integration tests for order placement and retrieval.
//!
//! These tests drive `OrderService` end to end over the in-memory catalog and
//! order repository.

use std::time::Duration;

use domain::{
    AccountId, CatalogProduct, DomainError, InMemoryCatalogService, OrderError, OrderService,
    PlaceOrder, ProductId, RequestedItem,
};
use order_store::{InMemoryOrderRepository, MAX_QUANTITY, OrderRepository};

type Service = OrderService<InMemoryOrderRepository, InMemoryCatalogService>;

/// Helper to create a service with a small catalog
async fn create_service() -> (Service, InMemoryOrderRepository, InMemoryCatalogService) {
    let repository = InMemoryOrderRepository::new();
    let catalog = InMemoryCatalogService::new();

    for (id, name, price) in [
        ("SKU-001", "Widget", 19.99),
        ("SKU-002", "Gadget", 0.1),
        ("SKU-003", "Gizmo", 0.2),
        ("SKU-004", "Doohickey", 1234.56),
    ] {
        catalog
            .put_product(CatalogProduct {
                id: ProductId::new(id),
                name: name.to_string(),
                description: format!("{name} description"),
                price,
            })
            .await
            .unwrap();
    }

    let service = OrderService::new(repository.clone(), catalog.clone());
    (service, repository, catalog)
}

mod order_placement {
    use super::*;

    #[tokio::test]
    async fn place_and_read_back_order() {
        let (service, _, _) = create_service().await;
        let account_id = AccountId::new("acct-1");

        let placed = service
            .place_order(PlaceOrder::new(
                account_id.clone(),
                vec![RequestedItem::new("SKU-001", 2), RequestedItem::new("SKU-004", 1)],
            ))
            .await
            .unwrap();

        let orders = service.orders_for_account(&account_id).await.unwrap();
        assert_eq!(orders.len(), 1);

        let order = &orders[0];
        assert_eq!(order.id(), placed.id());
        assert_eq!(order.account_id(), &account_id);
        assert_eq!(order.total_price(), placed.total_price());
        assert_eq!(order.created_at(), placed.created_at());
        assert_eq!(order.products(), placed.products());
    }

    #[tokio::test]
    async fn orders_returned_in_id_order() {
        let (service, _, _) = create_service().await;
        let account_id = AccountId::new("acct-1");

        let mut placed = Vec::new();
        for quantity in 1..=5 {
            let order = service
                .place_order(PlaceOrder::new(
                    account_id.clone(),
                    vec![RequestedItem::new("SKU-001", quantity)],
                ))
                .await
                .unwrap();
            placed.push(order.id());
        }

        let ids: Vec<_> = service
            .orders_for_account(&account_id)
            .await
            .unwrap()
            .iter()
            .map(|o| o.id())
            .collect();
        assert_eq!(ids, placed);
    }

    #[tokio::test]
    async fn accounts_see_only_their_orders() {
        let (service, _, _) = create_service().await;

        service
            .place_order(PlaceOrder::new("acct-1", vec![RequestedItem::new("SKU-001", 1)]))
            .await
            .unwrap();
        service
            .place_order(PlaceOrder::new("acct-2", vec![RequestedItem::new("SKU-002", 1)]))
            .await
            .unwrap();

        let orders = service
            .orders_for_account(&AccountId::new("acct-2"))
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].products()[0].product_id.as_str(), "SKU-002");

        assert!(
            service
                .orders_for_account(&AccountId::new("acct-3"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn line_items_keep_request_order() {
        let (service, _, _) = create_service().await;

        let order = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![
                    RequestedItem::new("SKU-003", 1),
                    RequestedItem::new("SKU-001", 1),
                    RequestedItem::new("SKU-002", 1),
                ],
            ))
            .await
            .unwrap();

        let stored = service.orders_for_account(order.account_id()).await.unwrap();
        let ids: Vec<_> = stored[0]
            .products()
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["SKU-003", "SKU-001", "SKU-002"]);
    }
}

mod totals {
    use super::*;

    #[tokio::test]
    async fn total_matches_sum_of_line_items() {
        let (service, _, _) = create_service().await;

        let cases: Vec<Vec<(&str, u32)>> = vec![
            vec![("SKU-001", 1)],
            vec![("SKU-002", 1), ("SKU-003", 1)],
            vec![("SKU-002", 3), ("SKU-003", 7), ("SKU-001", 2)],
            vec![("SKU-004", 9), ("SKU-002", 1000)],
        ];

        for case in cases {
            let catalog_prices = [
                ("SKU-001", 19.99),
                ("SKU-002", 0.1),
                ("SKU-003", 0.2),
                ("SKU-004", 1234.56),
            ];
            let expected: f64 = case
                .iter()
                .map(|(id, qty)| {
                    let price = catalog_prices.iter().find(|(p, _)| p == id).unwrap().1;
                    price * f64::from(*qty)
                })
                .sum();

            let order = service
                .place_order(PlaceOrder::new(
                    "acct-1",
                    case.iter()
                        .map(|(id, qty)| RequestedItem::new(*id, *qty))
                        .collect(),
                ))
                .await
                .unwrap();

            let line_sum: i64 = order
                .products()
                .iter()
                .map(|p| p.line_total().unwrap().cents())
                .sum();
            assert_eq!(order.total_price().cents(), line_sum);
            assert!((order.total_price().as_dollars_f64() - expected).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn cents_do_not_drift() {
        let (service, _, _) = create_service().await;

        // 0.1 + 0.2 in floating point is not 0.3; cents are exact.
        let order = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![RequestedItem::new("SKU-002", 1), RequestedItem::new("SKU-003", 1)],
            ))
            .await
            .unwrap();

        assert_eq!(order.total_price().cents(), 30);
        assert_eq!(order.total_price().to_string(), "$0.30");
    }

    #[tokio::test]
    async fn largest_storable_quantity_totals_exactly() {
        let (service, repository, _) = create_service().await;

        // SKU-002 costs 10 cents.
        let order = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![RequestedItem::new("SKU-002", MAX_QUANTITY)],
            ))
            .await
            .unwrap();

        assert_eq!(order.total_price().cents(), 10 * i64::from(MAX_QUANTITY));
        let stored = repository
            .find_by_account(&AccountId::new("acct-1"))
            .await
            .unwrap();
        assert_eq!(stored[0].total_price_cents, order.total_price().cents());
    }

    #[tokio::test]
    async fn quantity_at_u32_max_is_rejected() {
        let (service, repository, catalog) = create_service().await;

        let result = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![RequestedItem::new("SKU-001", u32::MAX)],
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(OrderError::InvalidQuantity { .. }))
        ));
        assert_eq!(catalog.lookup_count().await, 0);
        assert_eq!(repository.order_count().await, 0);
    }

    #[tokio::test]
    async fn total_beyond_money_range_is_rejected() {
        let (service, repository, catalog) = create_service().await;
        catalog
            .put_product(CatalogProduct {
                id: ProductId::new("SKU-BIG"),
                name: "Island".to_string(),
                description: String::new(),
                price: 1e9,
            })
            .await
            .unwrap();

        let result = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![
                    RequestedItem::new("SKU-001", 1),
                    RequestedItem::new("SKU-BIG", MAX_QUANTITY),
                ],
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(OrderError::TotalOutOfRange))
        ));
        assert_eq!(repository.order_count().await, 0);
    }
}

mod price_snapshot {
    use super::*;

    #[tokio::test]
    async fn later_catalog_changes_do_not_affect_placed_orders() {
        let (service, _, catalog) = create_service().await;

        let order = service
            .place_order(PlaceOrder::new("acct-1", vec![RequestedItem::new("SKU-001", 2)]))
            .await
            .unwrap();

        catalog
            .put_product(CatalogProduct {
                id: ProductId::new("SKU-001"),
                name: "Widget Deluxe".to_string(),
                description: "Renamed".to_string(),
                price: 99.0,
            })
            .await
            .unwrap();

        let stored = service.orders_for_account(order.account_id()).await.unwrap();
        let item = &stored[0].products()[0];
        assert_eq!(item.name, "Widget");
        assert_eq!(item.price.cents(), 1999);
        assert_eq!(stored[0].total_price().cents(), 3998);
    }
}

mod error_handling {
    use super::*;

    #[tokio::test]
    async fn empty_order_rejected() {
        let (service, repository, catalog) = create_service().await;

        let result = service.place_order(PlaceOrder::new("acct-1", vec![])).await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(OrderError::NoItems))
        ));
        assert_eq!(catalog.lookup_count().await, 0);
        assert_eq!(repository.order_count().await, 0);
    }

    #[tokio::test]
    async fn one_missing_product_fails_whole_order() {
        let (service, repository, _) = create_service().await;

        let result = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![
                    RequestedItem::new("SKU-001", 1),
                    RequestedItem::new("SKU-DOES-NOT-EXIST", 1),
                ],
            ))
            .await;

        assert!(matches!(result, Err(DomainError::ProductNotFound { .. })));
        assert_eq!(repository.order_count().await, 0);
        assert!(
            repository
                .find_by_account(&AccountId::new("acct-1"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn storage_failure_leaves_no_partial_order() {
        let (service, repository, _) = create_service().await;
        repository.set_fail_line_item_writes(true).await;

        let result = service
            .place_order(PlaceOrder::new(
                "acct-1",
                vec![RequestedItem::new("SKU-001", 1), RequestedItem::new("SKU-002", 1)],
            ))
            .await;

        assert!(matches!(result, Err(DomainError::OrderStore(_))));
        assert_eq!(repository.order_count().await, 0);
        assert_eq!(repository.line_item_count().await, 0);

        // Nothing is retried; the next call succeeds once storage recovers.
        repository.set_fail_line_item_writes(false).await;
        service
            .place_order(PlaceOrder::new("acct-1", vec![RequestedItem::new("SKU-001", 1)]))
            .await
            .unwrap();
        assert_eq!(repository.order_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_catalog_aborts_placement() {
        let (service, repository, catalog) = create_service().await;
        let service = service.with_catalog_timeout(Duration::from_secs(3));
        catalog.set_latency(Some(Duration::from_secs(10))).await;

        let result = service
            .place_order(PlaceOrder::new("acct-1", vec![RequestedItem::new("SKU-001", 1)]))
            .await;

        match result {
            Err(DomainError::UpstreamTimeout { service, timeout }) => {
                assert_eq!(service, "catalog");
                assert_eq!(timeout, Duration::from_secs(3));
            }
            other => panic!("expected UpstreamTimeout, got {other:?}"),
        }
        assert_eq!(repository.order_count().await, 0);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn concurrent_placements_all_persist() {
        let (service, _, _) = create_service().await;
        let account_id = AccountId::new("acct-1");

        let handles: Vec<_> = (1..=16)
            .map(|quantity| {
                let service = service.clone();
                let account_id = account_id.clone();
                tokio::spawn(async move {
                    service
                        .place_order(PlaceOrder::new(
                            account_id,
                            vec![RequestedItem::new("SKU-001", quantity)],
                        ))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let orders = service.orders_for_account(&account_id).await.unwrap();
        assert_eq!(orders.len(), 16);
        assert!(orders.windows(2).all(|pair| pair[0].id() < pair[1].id()));
    }
}
