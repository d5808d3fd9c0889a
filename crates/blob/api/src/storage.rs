//! Local blob storage.

use async_trait::async_trait;
use futures::AsyncRead;
use std::net::IpAddr;
use vertex_blob_primitives::{BlobHash, PaymentRate};

use crate::BlobResult;

/// A locally stored blob.
///
/// Read handles are exclusive resources: every handle returned by
/// [`open_for_reading`](Self::open_for_reading) must be passed back to
/// [`close_read_handle`](Self::close_read_handle) exactly once.
#[async_trait]
pub trait BlobFile: Send + Sync + 'static {
    /// Byte source for the blob content.
    type ReadHandle: AsyncRead + Unpin + Send + 'static;

    /// Content hash of the blob.
    fn blob_hash(&self) -> &BlobHash;

    /// Length in bytes.
    fn length(&self) -> u64;

    /// Whether the content has been verified against its hash.
    fn is_validated(&self) -> bool;

    /// Acquire a read handle, or `None` if the blob cannot be read right now.
    async fn open_for_reading(&self) -> Option<Self::ReadHandle>;

    /// Release a read handle acquired from this blob.
    ///
    /// Synchronous so it can run from cleanup paths.
    fn close_read_handle(&self, handle: Self::ReadHandle);
}

/// Blob storage shared by all connections.
#[async_trait]
pub trait BlobManager: Send + Sync + 'static {
    /// Blob type handed out by this manager.
    type Blob: BlobFile;

    /// The subset of `hashes` that is stored and validated locally.
    ///
    /// Unknown hashes are excluded, never an error.
    async fn completed_blobs(&self, hashes: &[BlobHash]) -> BlobResult<Vec<BlobHash>>;

    /// Look up a blob by hash.
    async fn get_blob(&self, hash: &BlobHash) -> BlobResult<Self::Blob>;

    /// Append an upload to the history (which blob, to whom, at what rate).
    async fn add_blob_to_upload_history(
        &self,
        hash: &BlobHash,
        host: IpAddr,
        rate: PaymentRate,
    ) -> BlobResult<()>;
}
