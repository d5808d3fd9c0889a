//! Query batches.

use serde::{Deserialize, Serialize};
use vertex_blob_primitives::BlobHash;

/// Recognized query keys, in the order the uploader lists them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter,
)]
pub enum QueryKey {
    /// Rate offer.
    #[strum(serialize = "blob_data_payment_rate")]
    PaymentRate,
    /// Download request.
    #[strum(serialize = "requested_blob")]
    RequestedBlob,
    /// Availability request.
    #[strum(serialize = "requested_blobs")]
    RequestedBlobs,
}

impl QueryKey {
    /// Wire name of this key.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Queries sent by a downloader in one round-trip. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryBatch {
    /// Blobs whose local availability is asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_blobs: Option<Vec<BlobHash>>,
    /// Offered payment rate per megabyte.
    #[serde(
        rename = "blob_data_payment_rate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_rate: Option<f64>,
    /// Blob the downloader wants streamed after the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_blob: Option<BlobHash>,
}

impl QueryBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask which of `blobs` are available.
    pub fn with_requested_blobs<I, H>(mut self, blobs: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<BlobHash>,
    {
        self.requested_blobs = Some(blobs.into_iter().map(Into::into).collect());
        self
    }

    /// Offer a payment rate.
    pub fn with_payment_rate(mut self, rate: f64) -> Self {
        self.payment_rate = Some(rate);
        self
    }

    /// Request a blob download.
    pub fn with_requested_blob(mut self, blob: impl Into<BlobHash>) -> Self {
        self.requested_blob = Some(blob.into());
        self
    }

    /// Whether the batch carries the given key.
    pub fn contains(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::PaymentRate => self.payment_rate.is_some(),
            QueryKey::RequestedBlob => self.requested_blob.is_some(),
            QueryKey::RequestedBlobs => self.requested_blobs.is_some(),
        }
    }

    /// Whether no recognized key is present.
    pub fn is_empty(&self) -> bool {
        self.requested_blobs.is_none() && self.payment_rate.is_none() && self.requested_blob.is_none()
    }
}
