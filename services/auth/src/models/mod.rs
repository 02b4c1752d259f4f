//! Authentication service models

pub mod role;
pub mod session;
pub mod user;

// Re-export for convenience
pub use role::{ParseRoleError, Role};
pub use session::{Session, SessionInfo};
pub use user::{CredentialRecord, LoginCredentials, NewCredential, UpdateCredential, UserSummary};
