//! Store errors

use thiserror::Error;

use crate::alias::AliasError;
use crate::storage::StorageError;

/// Errors returned by [`Store`](crate::Store) operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Alias input failed validation; nothing was changed
    #[error(transparent)]
    InvalidFormat(#[from] AliasError),

    /// The id is not in the loaded catalog
    #[error("Unknown author id '{id}'")]
    UnknownId { id: String },

    /// Reading or writing a persisted record failed
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),

    /// A persisted record could not be decoded or encoded
    #[error("Malformed record '{key}': {source}")]
    Record {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Check if this error came from the persistence gateway
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
