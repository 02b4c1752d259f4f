//! Session lifecycle and permission checks
//!
//! Sessions are plain values owned by the caller. The manager only holds the
//! idle timeout and answers questions about a session at a given instant.

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::{Role, Session, SessionInfo};

/// Default idle timeout: 15 minutes
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: i64 = 15 * 60;

/// Observable state of a client's session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    Expired,
}

/// Session manager enforcing the idle timeout and role checks
#[derive(Debug, Clone, Copy)]
pub struct SessionManager {
    idle_timeout: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_IDLE_TIMEOUT_SECONDS))
    }
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }

    /// Start a session for an authenticated identity
    pub fn start(&self, identity: &str, role: Role, now: DateTime<Utc>) -> Session {
        info!("Starting {} session for user: {}", role, identity);

        Session {
            token: Uuid::new_v4(),
            identity: identity.to_string(),
            role,
            created_at: now,
            last_active: now,
        }
    }

    /// Record user activity on the session
    ///
    /// An expired session is left untouched; only a fresh login replaces it.
    pub fn touch(&self, session: &mut Session, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.is_expired(session, now) {
            return Err(SessionError::Expired);
        }
        if now > session.last_active {
            session.last_active = now;
        }
        Ok(())
    }

    /// Whether the session has been idle for at least the timeout
    pub fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.last_active >= self.idle_timeout
    }

    /// Instant at which the session expires without further activity
    pub fn expires_at(&self, session: &Session) -> DateTime<Utc> {
        session.last_active + self.idle_timeout
    }

    /// Classify an optional session at `now`
    pub fn state(&self, session: Option<&Session>, now: DateTime<Utc>) -> SessionState {
        match session {
            None => SessionState::Anonymous,
            Some(s) if self.is_expired(s, now) => SessionState::Expired,
            Some(_) => SessionState::Authenticated,
        }
    }

    /// Whether the session is live and its role grants `required`
    pub fn require_role(&self, session: &Session, required: Role, now: DateTime<Utc>) -> bool {
        !self.is_expired(session, now) && session.role.satisfies(required)
    }

    /// Explain why access is denied, failing closed
    pub fn authorize(
        &self,
        session: Option<&Session>,
        required: Role,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        match (self.state(session, now), session) {
            (SessionState::Authenticated, Some(s)) if s.role.satisfies(required) => Ok(()),
            (SessionState::Authenticated, _) => Err(SessionError::Unauthorized),
            (SessionState::Expired, _) => Err(SessionError::Expired),
            (SessionState::Anonymous, _) => Err(SessionError::Anonymous),
        }
    }

    /// Boolean access check for the hosting layer
    pub fn check_access(&self, session: Option<&Session>, required: Role, now: DateTime<Utc>) -> bool {
        self.authorize(session, required, now).is_ok()
    }

    /// Describe a session for clients
    pub fn describe(&self, session: &Session) -> SessionInfo {
        SessionInfo {
            username: session.identity.clone(),
            role: session.role,
            last_active: session.last_active,
            expires_at: self.expires_at(session),
        }
    }
}
