//! Signup and login flows.
//!
//! `AuthService` composes the user store, the password hasher and the token
//! issuer. It is cheap to clone and shared by every request.

use anyhow::anyhow;
use shared_types::Credentials;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::repository::{Account, StoreError, UserStore};

use super::jwt;
use super::password::PasswordHasher;
use super::types::AuthConfig;

pub const EMAIL_MISSING: &str = "Email is missing.";
pub const PASSWORD_MISSING: &str = "Password is missing.";
pub const USER_NOT_FOUND: &str = "The user does not exist.";
pub const INVALID_PASSWORD: &str = "The provided password is invalid.";

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    config: Arc<AuthConfig>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            hasher,
            config,
        }
    }

    /// Register a new account.
    ///
    /// A store failure, including an already registered email, is reported
    /// as a generic server error so callers cannot probe for accounts.
    pub async fn signup(&self, credentials: Credentials) -> ApiResult<Account> {
        let email = validate(&credentials)?;
        let password_hash = self.hash_password(credentials.password).await?;

        match self.store.create(&email, &password_hash).await {
            Ok(account) => {
                tracing::info!("Created account {} for {}", account.id, account.email);
                Ok(account)
            }
            Err(StoreError::Conflict) => {
                tracing::warn!("Signup for already registered email: {}", email);
                Err(ApiError::Internal(anyhow!("signup conflict")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and mint a bearer token.
    pub async fn login(&self, credentials: Credentials) -> ApiResult<String> {
        let email = validate(&credentials)?;

        let account = self.store.find_by_email(&email).await?.ok_or_else(|| {
            tracing::info!("Login attempt for unknown account: {}", email);
            ApiError::NotFound(USER_NOT_FOUND.to_string())
        })?;

        let valid = self
            .verify_password(account.password_hash, credentials.password)
            .await?;
        if !valid {
            tracing::warn!("Invalid password for: {}", account.email);
            return Err(ApiError::unauthorized(INVALID_PASSWORD));
        }

        let token = jwt::create_token(&self.config, &account.email)?;
        tracing::info!("Successful login for: {}", account.email);

        Ok(token)
    }

    async fn hash_password(&self, password: String) -> ApiResult<String> {
        let hasher = self.hasher;
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| anyhow!("password hashing task failed: {}", e))??;
        Ok(hash)
    }

    async fn verify_password(&self, hash: String, password: String) -> ApiResult<bool> {
        let hasher = self.hasher;
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| anyhow!("password verification task failed: {}", e))?;
        Ok(valid)
    }
}

/// Both fields must be present. Returns the email with surrounding
/// whitespace removed.
fn validate(credentials: &Credentials) -> ApiResult<String> {
    let email = credentials.email.trim();
    if email.is_empty() {
        return Err(ApiError::validation(EMAIL_MISSING));
    }
    if credentials.password.is_empty() {
        return Err(ApiError::validation(PASSWORD_MISSING));
    }
    Ok(email.to_string())
}
