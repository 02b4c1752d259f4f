//! Repositories for the credential table

pub mod credentials;

pub use credentials::CredentialRepository;
