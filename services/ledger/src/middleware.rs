//! Role guard for ledger handlers
//!
//! Token resolution is done by `auth::middleware::session_middleware`; the
//! handlers receive the session and check the role they need here.

use auth::models::{Role, Session};
use chrono::Utc;
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Fail unless the session may read the ledger
pub fn require_viewer(state: &AppState, session: &Session) -> Result<(), ApiError> {
    require(state, session, Role::Viewer)
}

/// Fail unless the session may change the ledger
pub fn require_admin(state: &AppState, session: &Session) -> Result<(), ApiError> {
    require(state, session, Role::Admin)
}

fn require(state: &AppState, session: &Session, role: Role) -> Result<(), ApiError> {
    state
        .auth
        .sessions
        .authorize(Some(session), role, Utc::now())
        .map_err(|e| {
            warn!("User {} denied {} access: {}", session.identity, role, e);
            ApiError::Session(e)
        })
}
