//! Authentication module for password login with JWT bearer tokens.
//!
//! This module provides:
//! - bcrypt password hashing and verification
//! - JWT token creation and validation
//! - `AuthService`, the signup and login flows
//! - `require_auth` middleware for protecting routes

mod handlers;
mod jwt;
mod middleware;
pub mod password;
pub mod service;
pub mod types;

pub use handlers::{login, protected, signup, PROTECTED_RESOURCE};
pub use jwt::{create_token, validate_token, TokenError, HMAC_ALGORITHMS};
pub use middleware::{extract_auth_user, extract_bearer_token, require_auth};
pub use password::{HashError, PasswordHasher};
pub use service::AuthService;
pub use types::{AuthConfig, AuthUser, Claims, JwtSecret};
