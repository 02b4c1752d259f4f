//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// An authenticated session
///
/// The token identifies the session to the hosting layer; it carries no
/// authority by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub identity: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Session description returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub username: String,
    pub role: Role,
    pub last_active: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
