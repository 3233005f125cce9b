//! User store abstraction.
//!
//! The auth flow talks to persistence only through [`UserStore`], so the
//! Postgres store in `db` and the in-memory store below are interchangeable.

use async_trait::async_trait;
use shared_types::UserResponse;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Stored account. `password_hash` is the only password form ever persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        UserResponse {
            id: account.id,
            email: account.email,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An account with this email already exists
    #[error("email is already registered")]
    Conflict,

    /// Database connection pool error
    #[error("database connection error")]
    ConnectionPool(#[source] diesel_async::pooled_connection::deadpool::PoolError),

    /// Database query error
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for StoreError {
    fn from(err: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        StoreError::ConnectionPool(err)
    }
}

/// Accounts keyed by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, StoreError>;

    /// Look up an account by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
}

/// Process-local store. Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    accounts: HashMap<String, Account>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        let mut state = self.state.write().await;
        if state.accounts.contains_key(email) {
            return Err(StoreError::Conflict);
        }

        state.last_id += 1;
        let account = Account {
            id: state.last_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        state.accounts.insert(email.to_string(), account.clone());

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.state.read().await.accounts.get(email).cloned())
    }
}
