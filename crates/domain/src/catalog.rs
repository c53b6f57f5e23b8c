//! Catalog lookup port and in-memory implementation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use thiserror::Error;
use tokio::sync::RwLock;

/// Current catalog data for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    /// The product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price in dollars.
    pub price: f64,
}

/// Errors reported by the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or answered with an error.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog returned a price that cannot be charged.
    #[error("Invalid price {price} for product {product_id}")]
    InvalidPrice { product_id: ProductId, price: f64 },

    /// The product does not exist.
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

/// Read contract of the catalog service used when pricing orders.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Looks up every given product in one call.
    ///
    /// Unknown IDs are left out of the result rather than reported as errors.
    async fn lookup_products(
        &self,
        ids: &BTreeSet<ProductId>,
    ) -> Result<HashMap<ProductId, CatalogProduct>, CatalogError>;
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, CatalogProduct>,
    lookup_calls: usize,
    fail_on_lookup: bool,
    latency: Option<Duration>,
}

/// In-memory catalog service for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogService {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogService {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product with a generated ID and returns it.
    pub async fn create_product(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Result<CatalogProduct, CatalogError> {
        let product = CatalogProduct {
            id: ProductId::generate(),
            name: name.into(),
            description: description.into(),
            price,
        };
        self.put_product(product.clone()).await?;
        Ok(product)
    }

    /// Inserts or replaces a product.
    pub async fn put_product(&self, product: CatalogProduct) -> Result<(), CatalogError> {
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(CatalogError::InvalidPrice {
                product_id: product.id,
                price: product.price,
            });
        }
        self.state
            .write()
            .await
            .products
            .insert(product.id.clone(), product);
        Ok(())
    }

    /// Returns a single product.
    pub async fn get_product(&self, id: &ProductId) -> Result<CatalogProduct, CatalogError> {
        self.state
            .read()
            .await
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Returns a page of products ordered by ID.
    pub async fn list_products(&self, skip: usize, take: usize) -> Vec<CatalogProduct> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products.into_iter().skip(skip).take(take).collect()
    }

    /// Configures every lookup to fail.
    pub async fn set_fail_on_lookup(&self, fail: bool) {
        self.state.write().await.fail_on_lookup = fail;
    }

    /// Delays every lookup by the given duration.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.state.write().await.latency = latency;
    }

    /// Returns how many lookups have been served.
    pub async fn lookup_count(&self) -> usize {
        self.state.read().await.lookup_calls
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn lookup_products(
        &self,
        ids: &BTreeSet<ProductId>,
    ) -> Result<HashMap<ProductId, CatalogProduct>, CatalogError> {
        let latency = {
            let mut state = self.state.write().await;
            state.lookup_calls += 1;
            if state.fail_on_lookup {
                return Err(CatalogError::Unavailable("catalog is down".to_string()));
            }
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }
}
