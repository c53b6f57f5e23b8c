//! Order service: pricing, persistence, and retrieval of orders.

use std::time::{Duration, Instant};

use common::AccountId;
use order_store::OrderRepository;

use crate::catalog::{CatalogError, CatalogService};
use crate::error::DomainError;

use super::{Money, Order, OrderedProduct, PlaceOrder};

/// Time budget for the catalog lookup made while placing an order.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(3);

/// Service for placing and reading orders.
///
/// Owns the order invariants: every order is priced from the catalog at
/// placement time and stored atomically with all of its line items.
#[derive(Clone)]
pub struct OrderService<R: OrderRepository, C: CatalogService> {
    repository: R,
    catalog: C,
    catalog_timeout: Duration,
}

impl<R: OrderRepository, C: CatalogService> OrderService<R, C> {
    /// Creates a new order service.
    pub fn new(repository: R, catalog: C) -> Self {
        Self {
            repository,
            catalog,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
        }
    }

    /// Overrides the catalog lookup timeout.
    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }

    /// Places a new order.
    ///
    /// Validates the request, prices every distinct product with a single
    /// catalog lookup, and persists the order with all of its line items in
    /// one transaction. Nothing is stored if any step fails.
    #[tracing::instrument(skip(self, cmd), fields(account_id = %cmd.account_id, items = cmd.items.len()))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order, DomainError> {
        match self.try_place_order(cmd).await {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(order_id = %order.id(), total = %order.total_price(), "order placed");
                Ok(order)
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.kind()).increment(1);
                tracing::warn!(error = %e, kind = e.kind(), "order rejected");
                Err(e)
            }
        }
    }

    async fn try_place_order(&self, cmd: PlaceOrder) -> Result<Order, DomainError> {
        cmd.validate()?;

        let product_ids = cmd.distinct_product_ids();
        let started = Instant::now();
        let lookup = tokio::time::timeout(
            self.catalog_timeout,
            self.catalog.lookup_products(&product_ids),
        )
        .await;
        let outcome = match &lookup {
            Ok(Ok(_)) => "ok",
            Ok(Err(_)) => "error",
            Err(_) => "timeout",
        };
        metrics::histogram!("catalog_lookup_duration_seconds", "outcome" => outcome)
            .record(started.elapsed().as_secs_f64());
        let catalog = lookup.map_err(|_| DomainError::UpstreamTimeout {
            service: "catalog",
            timeout: self.catalog_timeout,
        })??;

        let missing: Vec<_> = product_ids
            .into_iter()
            .filter(|id| !catalog.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::ProductNotFound {
                product_ids: missing,
            });
        }

        let mut products = Vec::with_capacity(cmd.items.len());
        for item in cmd.items {
            let entry = catalog
                .get(&item.product_id)
                .ok_or_else(|| DomainError::ProductNotFound {
                    product_ids: vec![item.product_id.clone()],
                })?;
            let price =
                Money::from_dollars_f64(entry.price).ok_or_else(|| CatalogError::InvalidPrice {
                    product_id: item.product_id.clone(),
                    price: entry.price,
                })?;
            products.push(OrderedProduct {
                product_id: item.product_id,
                name: entry.name.clone(),
                description: entry.description.clone(),
                price,
                quantity: item.quantity,
            });
        }

        let order = Order::place(cmd.account_id, products)?;
        self.repository.save(&order.to_record()).await?;
        Ok(order)
    }

    /// Returns every order placed by an account, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Order>, DomainError> {
        let records = self.repository.find_by_account(account_id).await?;
        Ok(records.into_iter().map(Order::from_record).collect())
    }
}
