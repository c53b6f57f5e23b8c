//! The seam through which the resolver reads an account's orders.

use async_trait::async_trait;
use common::AccountId;
use domain::{CatalogService, DomainError, Order, OrderService};
use order_store::OrderRepository;

/// Anything that can list the orders of one account.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn orders_for_account(&self, account_id: &AccountId) -> Result<Vec<Order>, DomainError>;
}

#[async_trait]
impl<R, C> OrderSource for OrderService<R, C>
where
    R: OrderRepository,
    C: CatalogService,
{
    async fn orders_for_account(&self, account_id: &AccountId) -> Result<Vec<Order>, DomainError> {
        OrderService::orders_for_account(self, account_id).await
    }
}
