//! The single-slot upload session.
//!
//! A handler holds at most one [`TransferSession`]. The slot moves through
//! three states:
//!
//! ```text
//! Idle --service--> Ready --send--> Streaming --finalize--> Idle
//!                     |                 |
//!                     +----cancel-------+--abort--> (finalize) --> Idle
//! ```
//!
//! While streaming, the session itself is owned by the active upload; the
//! slot only keeps what cancellation needs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::AbortHandle;
use tracing::trace;
use vertex_blob_api::BlobFile;
use vertex_blob_primitives::BlobHash;

/// Blob prepared for upload, with its read handle and byte counter.
///
/// Dropping the session releases the read handle, so every handle is
/// closed exactly once whichever path ends the session.
pub struct TransferSession<B: BlobFile> {
    blob: B,
    handle: Option<B::ReadHandle>,
    bytes_uploaded: Arc<AtomicU64>,
}

impl<B: BlobFile> TransferSession<B> {
    /// Take ownership of an opened blob.
    pub(crate) fn open(blob: B, handle: B::ReadHandle) -> Self {
        Self {
            blob,
            handle: Some(handle),
            bytes_uploaded: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Hash of the blob being uploaded.
    pub fn blob_hash(&self) -> &BlobHash {
        self.blob.blob_hash()
    }

    /// Bytes delivered so far.
    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded.load(Ordering::Acquire)
    }

    /// Shared view of the byte counter.
    pub(crate) fn progress(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.bytes_uploaded)
    }

    /// Read handle and byte counter, borrowed together for streaming.
    pub(crate) fn stream_parts(&mut self) -> Option<(&mut B::ReadHandle, &AtomicU64)> {
        let counter = self.bytes_uploaded.as_ref();
        self.handle.as_mut().map(|handle| (handle, counter))
    }

    /// Consume the byte counter for billing, leaving it at zero.
    pub(crate) fn take_bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded.swap(0, Ordering::AcqRel)
    }
}

impl<B: BlobFile> Drop for TransferSession<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.blob.close_read_handle(handle);
            trace!(blob = %self.blob.blob_hash(), "read handle released");
        }
    }
}

impl<B: BlobFile> std::fmt::Debug for TransferSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferSession")
            .field("blob", self.blob_hash())
            .field("bytes_uploaded", &self.bytes_uploaded())
            .field("open", &self.handle.is_some())
            .finish()
    }
}

/// State of a handler's session slot.
pub(crate) enum SessionSlot<B: BlobFile> {
    /// No upload pending.
    Idle,
    /// A download request was serviced; streaming has not started.
    Ready(TransferSession<B>),
    /// The session is owned by an in-flight upload.
    Streaming {
        abort: AbortHandle,
        progress: Arc<AtomicU64>,
    },
}

impl<B: BlobFile> SessionSlot<B> {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub(crate) fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming { .. })
    }

    pub(crate) fn bytes_uploaded(&self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Ready(session) => session.bytes_uploaded(),
            Self::Streaming { progress, .. } => progress.load(Ordering::Acquire),
        }
    }

    pub(crate) fn state(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready(_) => "ready",
            Self::Streaming { .. } => "streaming",
        }
    }
}

impl<B: BlobFile> Default for SessionSlot<B> {
    fn default() -> Self {
        Self::Idle
    }
}
