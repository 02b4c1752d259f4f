//! Authentication for the studio ledger
//!
//! Credentials live in a CSV table of `Username,Password,Role` rows where the
//! password column holds a hex SHA-256 digest. A successful login produces a
//! [`Session`](models::Session) value; the hosting service keeps sessions in a
//! [`SessionRegistry`](registry::SessionRegistry) keyed by an opaque token and
//! passes them explicitly into every permission check.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod rate_limiter;
pub mod registry;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod validation;

use common::error::StoreResult;

use crate::{
    authenticator::Authenticator, config::AuthConfig, rate_limiter::RateLimiter,
    registry::SessionRegistry, repositories::CredentialRepository, session::SessionManager,
};

/// Authentication state shared across handlers
#[derive(Debug, Clone)]
pub struct AuthState {
    pub authenticator: Authenticator,
    pub sessions: SessionManager,
    pub registry: SessionRegistry,
    pub login_throttle: Option<RateLimiter>,
}

impl AuthState {
    /// Build the state from configuration, checking the credential table
    pub fn from_config(config: &AuthConfig) -> StoreResult<Self> {
        let credentials = CredentialRepository::open(config.credentials_file.clone())?;
        let sessions = SessionManager::new(config.idle_timeout());

        Ok(Self {
            authenticator: Authenticator::new(credentials, sessions),
            sessions,
            registry: SessionRegistry::new(),
            login_throttle: config.login_throttle.clone().map(RateLimiter::new),
        })
    }

    pub fn credentials(&self) -> &CredentialRepository {
        self.authenticator.credentials()
    }
}
