//! Federated resolution of an account and its orders.
//!
//! Each field of the graph is an independent edge with its own time budget.
//! Edges run concurrently; one failing or timing out leaves the others
//! untouched and the response is always returned.

use std::time::Duration;

use common::AccountId;
use serde::Serialize;

use crate::account::AccountService;
use crate::error::{FieldError, FieldErrorKind};
use crate::source::OrderSource;
use crate::view::{AccountView, OrderView};

/// Time budget for each edge of the account graph.
pub const DEFAULT_EDGE_TIMEOUT: Duration = Duration::from_secs(3);

const ACCOUNT_EDGE: &str = "account";
const ORDERS_EDGE: &str = "orders";

/// Resolves the account graph from the account service and an order source.
#[derive(Clone)]
pub struct AccountResolver<A: AccountService, O: OrderSource> {
    accounts: A,
    orders: O,
    account_timeout: Duration,
    orders_timeout: Duration,
}

impl<A: AccountService, O: OrderSource> AccountResolver<A, O> {
    pub fn new(accounts: A, orders: O) -> Self {
        Self {
            accounts,
            orders,
            account_timeout: DEFAULT_EDGE_TIMEOUT,
            orders_timeout: DEFAULT_EDGE_TIMEOUT,
        }
    }

    /// Sets the same budget for every edge.
    pub fn with_edge_timeout(self, timeout: Duration) -> Self {
        self.with_account_timeout(timeout).with_orders_timeout(timeout)
    }

    pub fn with_account_timeout(mut self, timeout: Duration) -> Self {
        self.account_timeout = timeout;
        self
    }

    pub fn with_orders_timeout(mut self, timeout: Duration) -> Self {
        self.orders_timeout = timeout;
        self
    }

    /// Resolves an account together with its orders.
    ///
    /// Never fails as a whole: each field carries either its value or the
    /// error that prevented it from resolving.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_account(&self, account_id: &AccountId) -> AccountGraph {
        let (account, orders) = tokio::join!(
            self.resolve_account_edge(account_id),
            self.resolve_orders_edge(account_id)
        );
        AccountGraph { account, orders }
    }

    async fn resolve_account_edge(
        &self,
        account_id: &AccountId,
    ) -> Result<AccountView, FieldError> {
        let result = match tokio::time::timeout(
            self.account_timeout,
            self.accounts.get_account(account_id),
        )
        .await
        {
            Ok(Ok(account)) => Ok(AccountView::from(account)),
            Ok(Err(e)) => Err(FieldError::from(e)),
            Err(_) => Err(FieldError::timeout(ACCOUNT_EDGE, self.account_timeout)),
        };
        result.inspect_err(|e| record_edge_failure(ACCOUNT_EDGE, e))
    }

    async fn resolve_orders_edge(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<OrderView>, FieldError> {
        let result = match tokio::time::timeout(
            self.orders_timeout,
            self.orders.orders_for_account(account_id),
        )
        .await
        {
            Ok(Ok(orders)) => Ok(orders.iter().map(OrderView::from).collect()),
            Ok(Err(e)) => Err(FieldError::from(e)),
            Err(_) => Err(FieldError::timeout(ORDERS_EDGE, self.orders_timeout)),
        };
        result.inspect_err(|e| record_edge_failure(ORDERS_EDGE, e))
    }
}

fn record_edge_failure(edge: &'static str, error: &FieldError) {
    tracing::warn!(edge, kind = error.kind.as_str(), error = %error, "edge failed to resolve");
    metrics::counter!(
        "gateway_edge_failures_total",
        "edge" => edge,
        "kind" => error.kind.as_str()
    )
    .increment(1);
}

/// An account with its orders, each field resolved independently.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "GraphResponse")]
pub struct AccountGraph {
    pub account: Result<AccountView, FieldError>,
    pub orders: Result<Vec<OrderView>, FieldError>,
}

impl AccountGraph {
    /// Returns true if any field failed to resolve.
    pub fn has_errors(&self) -> bool {
        self.account.is_err() || self.orders.is_err()
    }
}

#[derive(Serialize)]
struct GraphResponse {
    data: GraphData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<GraphError>,
}

#[derive(Serialize)]
struct GraphData {
    account: Option<AccountView>,
    orders: Option<Vec<OrderView>>,
}

#[derive(Serialize)]
struct GraphError {
    path: [&'static str; 1],
    kind: FieldErrorKind,
    message: String,
}

impl GraphError {
    fn new(field: &'static str, error: FieldError) -> Self {
        Self {
            path: [field],
            kind: error.kind,
            message: error.message,
        }
    }
}

impl From<AccountGraph> for GraphResponse {
    fn from(graph: AccountGraph) -> Self {
        let mut errors = Vec::new();
        let account = graph
            .account
            .map_err(|e| errors.push(GraphError::new(ACCOUNT_EDGE, e)))
            .ok();
        let orders = graph
            .orders
            .map_err(|e| errors.push(GraphError::new(ORDERS_EDGE, e)))
            .ok();
        Self {
            data: GraphData { account, orders },
            errors,
        }
    }
}
