//! Credential model and related functionality

use common::store::Table;
use serde::{Deserialize, Serialize};

use super::Role;

/// One row of the credential table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "Username")]
    pub username: String,
    /// Hex encoded SHA-256 digest of the password
    #[serde(rename = "Password")]
    pub password_hash: String,
    #[serde(rename = "Role")]
    pub role: Role,
}

impl Table for CredentialRecord {
    const NAME: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["Username", "Password", "Role"];
}

/// New credential creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Credential update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCredential {
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Credential listing entry, without the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub role: Role,
}

impl From<&CredentialRecord> for UserSummary {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            username: record.username.clone(),
            role: record.role,
        }
    }
}
