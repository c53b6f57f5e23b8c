//! Account endpoints: creation, listing, order history and the federated graph.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::AccountId;
use gateway::{AccountGraph, AccountView, OrderView};
use order_store::OrderRepository;
use serde::Deserialize;

use super::{AppState, ListParams};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
}

/// POST /accounts
#[tracing::instrument(skip(state, req))]
pub async fn create<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountView>), ApiError> {
    let account = state.accounts.create_account(req.name).await?;
    tracing::info!(account_id = %account.id, "account created");
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /accounts?skip=&take=
#[tracing::instrument(skip(state))]
pub async fn list<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<AccountView>> {
    let (skip, take) = params.page();
    let accounts = state.accounts.list_accounts(skip, take).await;
    Json(accounts.into_iter().map(AccountView::from).collect())
}

/// GET /accounts/{id}/orders: every order of the account, oldest first.
#[tracing::instrument(skip(state))]
pub async fn orders<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let account_id = parse_account_id(id)?;
    let orders = state.order_service.orders_for_account(&account_id).await?;
    Ok(Json(orders.iter().map(OrderView::from).collect()))
}

/// GET /accounts/{id}: the account with its orders.
///
/// Always answers 200; fields that failed to resolve are listed under
/// `errors` while the rest of the graph is still returned.
#[tracing::instrument(skip(state))]
pub async fn graph<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<AccountGraph>, ApiError> {
    let account_id = parse_account_id(id)?;
    Ok(Json(state.resolver.resolve_account(&account_id).await))
}

fn parse_account_id(id: String) -> Result<AccountId, ApiError> {
    let account_id = AccountId::new(id);
    if account_id.is_blank() {
        return Err(ApiError::BadRequest("Account ID is required".to_string()));
    }
    Ok(account_id)
}
