//! HTTP route handlers and the state they share.

pub mod accounts;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use domain::{InMemoryCatalogService, OrderService};
use gateway::{AccountResolver, InMemoryAccountService};
use order_store::OrderRepository;
use serde::Deserialize;

/// Order service wired to the catalog the binary runs with.
pub type Orders<R> = OrderService<R, InMemoryCatalogService>;

/// Shared application state accessible from all handlers.
pub struct AppState<R: OrderRepository + Clone> {
    pub order_service: Orders<R>,
    pub catalog: InMemoryCatalogService,
    pub accounts: InMemoryAccountService,
    pub resolver: AccountResolver<InMemoryAccountService, Orders<R>>,
    /// Name of the order storage backend, reported by `/health`.
    pub storage: &'static str,
}

/// Largest page a list endpoint returns.
pub const MAX_PAGE_SIZE: usize = 100;

/// `?skip=&take=` paging for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

impl ListParams {
    /// Returns `(skip, take)` with `take` defaulted and capped to [`MAX_PAGE_SIZE`].
    pub fn page(&self) -> (usize, usize) {
        let take = self.take.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
        (self.skip.unwrap_or(0), take)
    }
}
