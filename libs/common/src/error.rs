//! Custom error types for the common library
//!
//! This module defines the error type returned by the table store.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for table store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The table file does not exist
    #[error("Table file not found: {}", .0.display())]
    Missing(PathBuf),

    /// Error occurred while reading or writing a table file
    #[error("Table I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error occurred while parsing or serializing CSV rows
    #[error("Table format error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row does not match the expected columns
    #[error("Table schema error in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Configuration(String),

    /// A blocking store task panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Whether the error only reports an absent table file
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Missing(_))
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
