//! Error types for blob handler operations.
//!
//! Protocol refusals (`RATE_UNSET`, `BLOB_UNAVAILABLE`) are response fields,
//! not errors. The variants here are local malfunctions that fail the whole
//! exchange.

use vertex_blob_primitives::BlobHash;

/// Error type for blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Storage lookup or write failed.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// Blob is not known to the storage layer.
    #[error("blob not found: {hash}")]
    NotFound {
        /// Hash of the missing blob.
        hash: BlobHash,
    },
}

impl BlobError {
    /// Shorthand for a storage failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Result type for blob handler operations.
pub type BlobResult<T> = core::result::Result<T, BlobError>;
