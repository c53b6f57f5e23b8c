//! HTTP API server for order placement and the federated account graph.
//!
//! Provides REST endpoints for accounts, products and orders, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{InMemoryCatalogService, OrderService};
use gateway::{AccountResolver, InMemoryAccountService};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderRepository, OrderRepository};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: OrderRepository + Clone + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<R>))
        .route(
            "/accounts",
            post(routes::accounts::create::<R>).get(routes::accounts::list::<R>),
        )
        .route("/accounts/{id}", get(routes::accounts::graph::<R>))
        .route("/accounts/{id}/orders", get(routes::accounts::orders::<R>))
        .route(
            "/products",
            post(routes::products::create::<R>).get(routes::products::list::<R>),
        )
        .route("/products/{id}", get(routes::products::get::<R>))
        .route("/orders", post(routes::orders::create::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the order service, catalog, accounts and resolver around a repository.
pub fn create_state<R: OrderRepository + Clone + 'static>(
    repository: R,
    storage: &'static str,
    config: &Config,
) -> Arc<AppState<R>> {
    let catalog = InMemoryCatalogService::new();
    let accounts = InMemoryAccountService::new();
    let order_service = OrderService::new(repository, catalog.clone())
        .with_catalog_timeout(config.catalog_timeout);
    let resolver = AccountResolver::new(accounts.clone(), order_service.clone())
        .with_edge_timeout(config.edge_timeout);

    Arc::new(AppState {
        order_service,
        catalog,
        accounts,
        resolver,
        storage,
    })
}

/// Creates state over an in-memory order store with default timeouts.
pub fn create_default_state() -> Arc<AppState<InMemoryOrderRepository>> {
    create_state(InMemoryOrderRepository::new(), "memory", &Config::default())
}
