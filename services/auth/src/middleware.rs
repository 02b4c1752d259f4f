//! Middleware resolving the session behind a bearer token

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::{
    AuthState,
    error::{ApiError, SessionError},
    models::{Role, Session},
};

/// Extract the session token from the Authorization header
pub fn bearer_token(req: &Request<Body>) -> Option<Uuid> {
    let header = req.headers().typed_get::<Authorization<Bearer>>()?;
    Uuid::parse_str(header.token()).ok()
}

/// Resolve the bearer token to a live session and record the activity
///
/// The session is inserted into the request extensions for handlers.
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).ok_or(SessionError::Anonymous)?;

    let session = state
        .registry
        .resume(&state.sessions, token, Utc::now())
        .await
        .map_err(|e| {
            warn!("Rejected request: {}", e);
            e
        })?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

/// Fail unless `session` grants `required`
pub fn require_role(
    state: &AuthState,
    session: &Session,
    required: Role,
) -> Result<(), ApiError> {
    state
        .sessions
        .authorize(Some(session), required, Utc::now())
        .map_err(|e| {
            warn!(
                "User {} denied {} access: {}",
                session.identity, required, e
            );
            ApiError::Session(e)
        })
}
