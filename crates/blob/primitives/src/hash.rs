//! Content address of a blob.

use serde::{Deserialize, Serialize};

/// Opaque content hash identifying a blob.
///
/// The handler never interprets the hash; it is only compared and forwarded
/// to the storage layer.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct BlobHash(String);

impl BlobHash {
    /// Create a blob hash from any string-like value.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BlobHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlobHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_owned())
    }
}
