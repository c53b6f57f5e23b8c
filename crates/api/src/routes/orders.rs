//! Order placement endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{PlaceOrder, RequestedItem};
use gateway::OrderView;
use order_store::OrderRepository;
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub account_id: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        PlaceOrder::new(
            req.account_id,
            req.items
                .into_iter()
                .map(|item| RequestedItem::new(item.product_id, item.quantity))
                .collect(),
        )
    }
}

// -- Handlers --

/// POST /orders: prices the items from the catalog and stores the order.
#[tracing::instrument(skip(state, req))]
pub async fn create<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>), ApiError> {
    let order = state.order_service.place_order(req.into()).await?;
    Ok((StatusCode::CREATED, Json(OrderView::from(&order))))
}
