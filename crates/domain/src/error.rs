//! Domain error types.

use std::time::Duration;

use common::ProductId;
use order_store::OrderStoreError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::order::OrderError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request was rejected before contacting any other service.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderError),

    /// One or more requested products do not exist in the catalog.
    #[error("Products not found: {}", join_ids(.product_ids))]
    ProductNotFound { product_ids: Vec<ProductId> },

    /// An error occurred in the order store.
    #[error("Order store error: {0}")]
    OrderStore(#[from] OrderStoreError),

    /// The catalog failed to answer.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A remote call did not finish within its time budget.
    #[error("{service} did not respond within {timeout:?}")]
    UpstreamTimeout {
        service: &'static str,
        timeout: Duration,
    },
}

impl DomainError {
    /// Short machine-readable label, used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::ProductNotFound { .. } => "product_not_found",
            DomainError::OrderStore(_) => "repository",
            DomainError::Catalog(_) => "catalog",
            DomainError::UpstreamTimeout { .. } => "upstream_timeout",
        }
    }
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
