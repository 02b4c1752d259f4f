//! Username/password authentication against the credential table

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::models::Session;
use crate::password::verify_password;
use crate::repositories::CredentialRepository;
use crate::session::SessionManager;

/// Compared against when the username is unknown (SHA-256 of the empty string)
const PLACEHOLDER_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Verifies credentials and opens sessions
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: CredentialRepository,
    sessions: SessionManager,
}

impl Authenticator {
    pub fn new(credentials: CredentialRepository, sessions: SessionManager) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    /// Authenticate `username` with `password`, opening a session at `now`
    ///
    /// Unknown users and wrong passwords fail with the same error. Unknown
    /// users are checked against a placeholder digest so both paths hash and
    /// compare.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        if username.is_empty() {
            warn!("Rejected login with empty username");
            return Err(AuthError::InvalidCredentials);
        }

        let record = self.credentials.find_by_username(username)?;

        let stored_hash = record
            .as_ref()
            .map_or(PLACEHOLDER_HASH, |r| r.password_hash.as_str());
        let verified = verify_password(password, stored_hash) && record.is_some();

        match record {
            Some(record) if verified => {
                info!("User {} authenticated", username);
                Ok(self.sessions.start(&record.username, record.role, now))
            }
            _ => {
                warn!("Failed login attempt for user: {}", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub fn credentials(&self) -> &CredentialRepository {
        &self.credentials
    }
}
