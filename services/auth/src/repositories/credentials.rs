//! Credential repository backed by the users CSV table

use std::collections::HashSet;
use std::path::PathBuf;

use common::error::{StoreError, StoreResult};
use common::store::{load_table, save_table};
use tracing::info;

use crate::error::CredentialError;
use crate::models::{CredentialRecord, NewCredential, Role, UpdateCredential, UserSummary};
use crate::password::hash_password;
use crate::validation::{validate_password, validate_username};

/// Credential repository
///
/// The table is re-read on every call, so edits made to the file while the
/// service runs are picked up on the next login.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    path: PathBuf,
}

impl CredentialRepository {
    /// Create a repository over `path` without touching the file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a repository and check that the table is readable
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let repository = Self::new(path);
        let records = repository.load()?;
        info!(
            "Loaded {} credentials from {}",
            records.len(),
            repository.path.display()
        );
        Ok(repository)
    }

    /// Load every credential record
    pub fn load(&self) -> StoreResult<Vec<CredentialRecord>> {
        let records: Vec<CredentialRecord> = load_table(&self.path)?;

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.username.as_str()) {
                return Err(StoreError::Schema {
                    path: self.path.clone(),
                    message: format!("duplicate username: {}", record.username),
                });
            }
        }

        Ok(records)
    }

    /// Find a credential by username
    pub fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|record| record.username == username))
    }

    /// List every account without password hashes
    pub fn list(&self) -> StoreResult<Vec<UserSummary>> {
        Ok(self.load()?.iter().map(UserSummary::from).collect())
    }

    /// Create a new credential
    pub fn create(&self, new_user: &NewCredential) -> Result<UserSummary, CredentialError> {
        info!("Creating credential for user: {}", new_user.username);

        validate_username(&new_user.username).map_err(CredentialError::Validation)?;
        validate_password(&new_user.password).map_err(CredentialError::Validation)?;

        let mut records = self.load()?;
        if records.iter().any(|r| r.username == new_user.username) {
            return Err(CredentialError::DuplicateUsername(new_user.username.clone()));
        }

        let record = CredentialRecord {
            username: new_user.username.clone(),
            password_hash: hash_password(&new_user.password),
            role: new_user.role,
        };
        let summary = UserSummary::from(&record);
        records.push(record);
        save_table(&self.path, &records)?;

        Ok(summary)
    }

    /// Change the password and/or role of an existing credential
    pub fn update(
        &self,
        username: &str,
        changes: &UpdateCredential,
    ) -> Result<UserSummary, CredentialError> {
        info!("Updating credential for user: {}", username);

        if let Some(password) = &changes.password {
            validate_password(password).map_err(CredentialError::Validation)?;
        }

        let mut records = self.load()?;
        let index = records
            .iter()
            .position(|r| r.username == username)
            .ok_or_else(|| CredentialError::UnknownUser(username.to_string()))?;

        if let Some(role) = changes.role {
            if role != Role::Admin && is_last_admin(&records, index) {
                return Err(CredentialError::LastAdmin);
            }
            records[index].role = role;
        }
        if let Some(password) = &changes.password {
            records[index].password_hash = hash_password(password);
        }

        let summary = UserSummary::from(&records[index]);
        save_table(&self.path, &records)?;

        Ok(summary)
    }

    /// Delete a credential
    pub fn delete(&self, username: &str) -> Result<(), CredentialError> {
        info!("Deleting credential for user: {}", username);

        let mut records = self.load()?;
        let index = records
            .iter()
            .position(|r| r.username == username)
            .ok_or_else(|| CredentialError::UnknownUser(username.to_string()))?;

        if is_last_admin(&records, index) {
            return Err(CredentialError::LastAdmin);
        }

        records.remove(index);
        save_table(&self.path, &records)?;

        Ok(())
    }
}

fn is_last_admin(records: &[CredentialRecord], index: usize) -> bool {
    records[index].role == Role::Admin
        && records.iter().filter(|r| r.role == Role::Admin).count() == 1
}
