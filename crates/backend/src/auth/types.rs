//! Auth-related types and configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::jwt::TokenError;

/// Issuer claim stamped on every token unless `TOKEN_ISSUER` overrides it.
pub const DEFAULT_ISSUER: &str = "authgate";

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub email: String,
    /// Issuer
    pub iss: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp, present only when a token lifetime is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

/// HMAC signing key. Cannot be empty and never prints its contents.
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret([REDACTED])")
    }
}

/// Token signing and verification settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: JwtSecret,
    pub issuer: String,
    /// `None` issues tokens without an `exp` claim.
    pub token_ttl: Option<Duration>,
}

impl AuthConfig {
    pub fn new(jwt_secret: JwtSecret) -> Self {
        Self {
            jwt_secret,
            issuer: DEFAULT_ISSUER.to_string(),
            token_ttl: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = Some(ttl);
        self
    }
}
