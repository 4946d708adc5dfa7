//! Application error types.
//!
//! Every failure in the authentication pipeline and the account handlers is
//! expressed as an [`AppError`] variant; the single [`IntoResponse`] impl is
//! the only place an error becomes an HTTP status and body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use haulyard_core::auth::AuthError;
use haulyard_core::models::account::ActiveStatus;
use haulyard_core::store::StoreError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    /// No bearer header and no access cookie on a protected route.
    #[error("No credential provided")]
    NoCredential,

    /// Access token past its expiry. Mapped to 401 so clients know to
    /// run the refresh flow; every other token failure maps to 403.
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    /// Token verified but the account no longer exists.
    #[error("Account does not exist")]
    AccountNotFound,

    /// Account is BLOCKED or INACTIVE. The status is carried for logs;
    /// the HTTP body stays generic.
    #[error("Account is {0}")]
    AccountDisabled(ActiveStatus),

    #[error("Account has been deleted")]
    AccountDeleted,

    #[error("You are not permitted to access this resource")]
    Forbidden,

    /// Login-time rejection. One message for every root cause so a
    /// caller cannot probe which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::NoCredential => (
                StatusCode::UNAUTHORIZED,
                "no_credential",
                "No credential provided".to_string(),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Token expired".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::FORBIDDEN,
                "invalid_token",
                "Invalid token".to_string(),
            ),
            AppError::AccountNotFound => (
                StatusCode::UNAUTHORIZED,
                "account_not_found",
                "Account does not exist".to_string(),
            ),
            AppError::AccountDisabled(_) => (
                StatusCode::FORBIDDEN,
                "account_disabled",
                "Account is disabled".to_string(),
            ),
            AppError::AccountDeleted => (
                StatusCode::FORBIDDEN,
                "account_deleted",
                "Account has been deleted".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "You are not permitted to access this resource".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password".to_string(),
            ),
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.clone()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.clone()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.clone()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenExpired => AppError::TokenExpired,
            AuthError::InvalidToken(_) => AppError::InvalidToken,
            AuthError::Hash(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(_) => AppError::Conflict("Email already registered".into()),
            StoreError::Database(e) => AppError::Internal(e.to_string()),
            StoreError::InvalidData(msg) => AppError::Internal(msg),
        }
    }
}
