//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{CatalogError, DomainError};
use gateway::AccountError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),
    /// Order placement or retrieval failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Account service error.
    #[error(transparent)]
    Account(#[from] AccountError),
    /// Catalog error on a direct catalog call.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    /// Returns the HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err {
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                DomainError::Catalog(_) => StatusCode::BAD_GATEWAY,
                DomainError::OrderStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Account(err) => match err {
                AccountError::NotFound(_) => StatusCode::NOT_FOUND,
                AccountError::NameRequired => StatusCode::BAD_REQUEST,
                AccountError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::InvalidPrice { .. } => StatusCode::BAD_REQUEST,
                CatalogError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, status = status.as_u16(), "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
