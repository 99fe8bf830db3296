//! Error types for the record store.

use crate::contract::Column;
use thiserror::Error;

/// Record store result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Record store errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// A supplied field failed validation. Nothing was written.
    #[error("Invalid {field}: {reason}")]
    Validation { field: Column, reason: String },

    /// The address matched neither the collection nor the item pattern.
    #[error("Unknown address: {0}")]
    UnknownAddress(String),

    /// The storage engine reported no row written for an insert.
    #[error("Failed to insert row for {0}")]
    InsertFailed(String),

    /// The underlying medium could not be opened.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// SQLx error (query, decode, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid state (schema version, malformed row)
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DbError {
    /// Create a validation error for a field.
    pub fn validation(field: Column, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// The offending field, if this is a validation error.
    pub fn field(&self) -> Option<Column> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}
