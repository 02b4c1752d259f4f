//! Error types for authentication, sessions and credential management

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;

/// Authentication failure
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are never distinguished
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The credential table could not be read
    #[error("Credential store unavailable: {0}")]
    CredentialStore(#[from] StoreError),
}

/// Session check failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No authenticated session is present
    #[error("Not authenticated")]
    Anonymous,

    /// The session was idle for longer than the timeout
    #[error("Session expired")]
    Expired,

    /// The session role does not grant the requested action
    #[error("Permission denied")]
    Unauthorized,
}

/// Credential administration failure
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("User {0} already exists")]
    DuplicateUsername(String),

    #[error("User {0} not found")]
    UnknownUser(String),

    #[error("{0}")]
    Validation(String),

    /// Removing or demoting the account would leave no admin
    #[error("At least one admin account must remain")]
    LastAdmin,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// HTTP error type for the authentication routes
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many login attempts")]
    TooManyRequests,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials".to_string())
            }
            ApiError::Auth(AuthError::CredentialStore(e)) => {
                tracing::error!("Credential store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Session(SessionError::Anonymous) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated".to_string())
            }
            ApiError::Session(SessionError::Expired) => {
                (StatusCode::UNAUTHORIZED, "session_expired".to_string())
            }
            ApiError::Session(SessionError::Unauthorized) => {
                (StatusCode::FORBIDDEN, "permission_denied".to_string())
            }
            ApiError::Credential(CredentialError::DuplicateUsername(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Credential(CredentialError::UnknownUser(_)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Credential(CredentialError::Validation(_))
            | ApiError::Credential(CredentialError::LastAdmin) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Credential(CredentialError::Store(e)) => {
                tracing::error!("Credential store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, "too_many_attempts".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for auth route results
pub type ApiResult<T> = Result<T, ApiError>;
