//! Authentication HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use shared_types::{Credentials, ProtectedResponse, TokenResponse, UserResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::types::AuthUser;

/// Payload served by `GET /protected`.
pub const PROTECTED_RESOURCE: &str = "Here is your super secret resource.";

/// Register an account. Responds with its id and email.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(credentials) = payload?;
    let account = state.auth_service.signup(credentials).await?;

    Ok(Json(account.into()))
}

/// Log in. The token is returned in the body and in the `Authorization`
/// response header.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(credentials) = payload?;
    let token = state.auth_service.login(credentials).await?;

    let header_value = HeaderValue::from_str(&token)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("token is not a valid header: {}", e)))?;

    Ok((
        [(header::AUTHORIZATION, header_value)],
        Json(TokenResponse { token }),
    )
        .into_response())
}

/// The resource behind `require_auth`.
pub async fn protected(Extension(user): Extension<AuthUser>) -> Json<ProtectedResponse> {
    tracing::debug!("Serving protected resource to: {}", user.email);

    Json(ProtectedResponse {
        data: PROTECTED_RESOURCE.to_string(),
    })
}
