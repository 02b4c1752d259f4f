//! Custom error types for the ledger service

use auth::error::SessionError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;

/// Custom error type for the ledger service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Session missing, expired or lacking the role
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Table store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Session(SessionError::Anonymous) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated".to_string())
            }
            ApiError::Session(SessionError::Expired) => {
                (StatusCode::UNAUTHORIZED, "session_expired".to_string())
            }
            ApiError::Session(SessionError::Unauthorized) => {
                (StatusCode::FORBIDDEN, "permission_denied".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store(e) => {
                tracing::error!("Ledger store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
