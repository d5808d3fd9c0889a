//! Response batches.

use serde::{Deserialize, Serialize};
use vertex_blob_primitives::{BlobHash, NegotiationReply};

/// Protocol-level refusal of a download request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseError {
    /// No payment rate has been negotiated on this connection yet.
    RateUnset,
    /// The blob is unknown, not validated, or cannot be opened.
    BlobUnavailable,
}

/// Metadata of the blob that will be streamed after the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingBlob {
    /// Hash of the blob.
    pub blob_hash: BlobHash,
    /// Length in bytes.
    pub length: u64,
}

/// Response accumulated across the stages of one query batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBatch {
    /// Requested blobs that are stored and validated locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_blobs: Option<Vec<BlobHash>>,
    /// Outcome of the rate offer.
    #[serde(flatten)]
    pub negotiation: Option<NegotiationReply>,
    /// Blob about to be streamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_blob: Option<IncomingBlob>,
    /// Why the download request was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl ResponseBatch {
    /// Empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob will be streamed after this response.
    pub fn has_incoming_blob(&self) -> bool {
        self.incoming_blob.is_some()
    }
}
