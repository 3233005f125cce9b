//! Unified error handling for the backend API.
//!
//! `ApiError` implements `IntoResponse`, so handlers use the `?` operator and
//! every failure leaves the service as a `{"message": ...}` body with the
//! status code of its category. Internal failures are logged here and never
//! reach the client in detail.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared_types::ErrorResponse;
use thiserror::Error;

use crate::auth::{HashError, TokenError};
use crate::repository::StoreError;

/// Body sent for every internal failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server error.";

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty, or undecodable input
    #[error("{0}")]
    Validation(String),

    /// Login for an account that does not exist
    #[error("{0}")]
    NotFound(String),

    /// Bad credentials or a bearer token that failed verification
    #[error("{0}")]
    Unauthorized(String),

    /// Store, hashing, or signing failure
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl From<HashError> for ApiError {
    fn from(err: HashError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        if err.is_rejection() {
            ApiError::Unauthorized(err.to_string())
        } else {
            ApiError::Internal(anyhow::Error::new(err))
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::Validation("Invalid request body.".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Unauthorized(msg) => {
                msg
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                SERVER_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
