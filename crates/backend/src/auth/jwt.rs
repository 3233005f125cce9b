//! JWT token creation and validation.
//!
//! Tokens are HS256-signed with the process-wide secret. Validation runs a
//! fixed pipeline: parse the header, pin the algorithm to the HMAC family,
//! then check signature, issuer and (when present) expiry.

use chrono::Utc;
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use thiserror::Error;

use super::types::{AuthConfig, Claims};

/// Algorithms a presented token may declare. Anything else is refused before
/// the signature is looked at.
pub const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid authorization header.")]
    MalformedAuthHeader,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("Token algorithm is not permitted.")]
    UnsupportedAlgorithm,

    #[error("Token signature is invalid.")]
    InvalidSignature,

    #[error("Token has expired.")]
    Expired,

    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("token could not be signed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Whether this error rejects a presented token, as opposed to a server
    /// side failure while issuing one.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TokenError::MissingSecret | TokenError::Signing(_))
    }
}

/// Create a new JWT token for an account.
pub fn create_token(config: &AuthConfig, email: &str) -> Result<String, TokenError> {
    let now = Utc::now();

    let claims = Claims {
        email: email.to_string(),
        iss: config.issuer.clone(),
        iat: now.timestamp(),
        exp: config.token_ttl.map(|ttl| (now + ttl).timestamp()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Validate a JWT token and return claims.
pub fn validate_token(config: &AuthConfig, token: &str) -> Result<Claims, TokenError> {
    let header = decode_header(token).map_err(|_| TokenError::InvalidToken)?;

    if !HMAC_ALGORITHMS.contains(&header.alg) {
        return Err(TokenError::UnsupportedAlgorithm);
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation(config),
    )
    .map_err(map_jwt_error)?;

    Ok(token_data.claims)
}

fn validation(config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    // `exp` is enforced when present but not required
    validation.set_required_spec_claims(&["iss"]);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.leeway = 0;
    validation
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm,
        _ => TokenError::InvalidToken,
    }
}
