//! Credential authentication service.
//!
//! Registers accounts with bcrypt-hashed passwords, logs them in with signed
//! bearer tokens, and gates `/protected` behind token verification.

use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;

use auth::{AuthConfig, AuthService, PasswordHasher};
use repository::UserStore;

/// Shared handler state. The signing config is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth_config: Arc<AuthConfig>,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, auth_config: AuthConfig) -> Self {
        let auth_config = Arc::new(auth_config);
        Self {
            auth_service: AuthService::new(store, hasher, auth_config.clone()),
            auth_config,
        }
    }
}
