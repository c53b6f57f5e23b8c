//! Gateway error types.

use std::time::Duration;

use common::AccountId;
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Errors reported by the account service.
#[derive(Debug, Error)]
pub enum AccountError {
    /// No account exists with the given ID.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Account names must not be blank.
    #[error("Account name is required")]
    NameRequired,

    /// The account service could not be reached or answered with an error.
    #[error("Account service unavailable: {0}")]
    Unavailable(String),
}

/// Category of a field that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Timeout,
    NotFound,
    Upstream,
}

impl FieldErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Timeout => "timeout",
            FieldErrorKind::NotFound => "not_found",
            FieldErrorKind::Upstream => "upstream",
        }
    }
}

/// Error attached to a single field of a resolved graph.
///
/// A field error never fails the whole response; sibling fields still
/// carry their values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The edge did not answer within its budget.
    pub fn timeout(edge: &str, timeout: Duration) -> Self {
        Self::new(
            FieldErrorKind::Timeout,
            format!("{edge} did not resolve within {timeout:?}"),
        )
    }
}

impl From<AccountError> for FieldError {
    fn from(err: AccountError) -> Self {
        let kind = match err {
            AccountError::NotFound(_) => FieldErrorKind::NotFound,
            AccountError::NameRequired | AccountError::Unavailable(_) => FieldErrorKind::Upstream,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<DomainError> for FieldError {
    fn from(err: DomainError) -> Self {
        let kind = match err {
            DomainError::UpstreamTimeout { .. } => FieldErrorKind::Timeout,
            _ => FieldErrorKind::Upstream,
        };
        Self::new(kind, err.to_string())
    }
}
