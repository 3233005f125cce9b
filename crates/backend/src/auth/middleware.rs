//! Authentication middleware layer for protecting routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::AppState;

use super::jwt::{self, TokenError};
use super::types::{AuthConfig, AuthUser};

/// Middleware function that requires a valid bearer token.
///
/// Use with `axum::middleware::from_fn_with_state`. Rejected requests get a
/// 401 and never reach the wrapped handler; accepted ones carry an
/// [`AuthUser`] extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match extract_auth_user(request.headers(), &state.auth_config) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                "Rejected unauthenticated request to {}: {:?}",
                request.uri().path(),
                err
            );
            ApiError::from(err).into_response()
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// The value must split on whitespace into exactly a scheme and a token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::MalformedAuthHeader)?
        .to_str()
        .map_err(|_| TokenError::MalformedAuthHeader)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(TokenError::MalformedAuthHeader),
    }
}

/// Extract and validate the caller from request headers.
pub fn extract_auth_user(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthUser, TokenError> {
    let token = extract_bearer_token(headers)?;
    let claims = jwt::validate_token(config, token)?;

    Ok(AuthUser {
        email: claims.email,
    })
}
