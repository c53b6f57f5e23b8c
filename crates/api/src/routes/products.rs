//! Catalog endpoints backed by the in-memory catalog.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::CatalogProduct;
use order_store::OrderRepository;
use serde::{Deserialize, Serialize};

use super::{AppState, ListParams};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl From<CatalogProduct> for ProductResponse {
    fn from(product: CatalogProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }
}

/// POST /products
#[tracing::instrument(skip(state, req))]
pub async fn create<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Product name is required".to_string()));
    }
    let product = state
        .catalog
        .create_product(req.name, req.description, req.price)
        .await?;
    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products/{id}
#[tracing::instrument(skip(state))]
pub async fn get<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.catalog.get_product(&ProductId::new(id)).await?;
    Ok(Json(product.into()))
}

/// GET /products?skip=&take=
#[tracing::instrument(skip(state))]
pub async fn list<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<ProductResponse>> {
    let (skip, take) = params.page();
    let products = state.catalog.list_products(skip, take).await;
    Json(products.into_iter().map(ProductResponse::from).collect())
}
