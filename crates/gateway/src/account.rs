//! Account service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::AccountId;
use tokio::sync::RwLock;

use crate::error::AccountError;

/// An account as reported by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
}

/// Read contract of the account service.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Fetches a single account.
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;
}

#[derive(Debug, Default)]
struct InMemoryAccountState {
    accounts: HashMap<AccountId, Account>,
    fail_on_get: bool,
    latency: Option<Duration>,
}

/// In-memory account service for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountService {
    state: Arc<RwLock<InMemoryAccountState>>,
}

impl InMemoryAccountService {
    /// Creates a new in-memory account service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an account with a generated ID.
    pub async fn create_account(&self, name: impl Into<String>) -> Result<Account, AccountError> {
        let account = Account {
            id: AccountId::generate(),
            name: name.into(),
        };
        self.put_account(account.clone()).await?;
        Ok(account)
    }

    /// Inserts or replaces an account.
    pub async fn put_account(&self, account: Account) -> Result<(), AccountError> {
        if account.name.trim().is_empty() {
            return Err(AccountError::NameRequired);
        }
        self.state
            .write()
            .await
            .accounts
            .insert(account.id.clone(), account);
        Ok(())
    }

    /// Returns a page of accounts ordered by ID.
    pub async fn list_accounts(&self, skip: usize, take: usize) -> Vec<Account> {
        let state = self.state.read().await;
        let mut accounts: Vec<_> = state.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts.into_iter().skip(skip).take(take).collect()
    }

    /// Configures every lookup to fail.
    pub async fn set_fail_on_get(&self, fail: bool) {
        self.state.write().await.fail_on_get = fail;
    }

    /// Delays every lookup by the given duration.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.state.write().await.latency = latency;
    }

    /// Returns the number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }
}

#[async_trait]
impl AccountService for InMemoryAccountService {
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        let latency = {
            let state = self.state.read().await;
            if state.fail_on_get {
                return Err(AccountError::Unavailable("account service is down".to_string()));
            }
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.state
            .read()
            .await
            .accounts
            .get(id)
            .cloned()
            .ok_or_else(|| AccountError::NotFound(id.clone()))
    }
}
