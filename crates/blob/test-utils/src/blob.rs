//! In-memory blobs with instrumented read handles.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::AsyncRead;
use vertex_blob_api::BlobFile;
use vertex_blob_primitives::BlobHash;

/// Counts read-handle acquisitions and releases.
#[derive(Debug, Default)]
pub struct HandleTracker {
    opened: AtomicUsize,
    closed: AtomicUsize,
    open_now: AtomicUsize,
    max_open: AtomicUsize,
}

impl HandleTracker {
    /// Create a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn on_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let now = self.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_open.fetch_max(now, Ordering::SeqCst);
    }

    fn on_close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        self.open_now.fetch_sub(1, Ordering::SeqCst);
    }

    /// Handles acquired so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Handles released so far.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Handles currently held.
    pub fn open_now(&self) -> usize {
        self.open_now.load(Ordering::SeqCst)
    }

    /// Highest number of handles held at the same time.
    pub fn max_concurrent_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }
}

/// How a read handle delivers its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadBehaviour {
    /// Deliver everything, then end of file.
    #[default]
    Normal,
    /// Deliver this many bytes, then never make progress again.
    StallAfter(usize),
    /// Deliver this many bytes, then fail.
    FailAfter(usize),
}

/// Blob held in memory.
#[derive(Debug, Clone)]
pub struct MemoryBlob {
    hash: BlobHash,
    data: Bytes,
    validated: bool,
    openable: bool,
    behaviour: ReadBehaviour,
    tracker: Arc<HandleTracker>,
}

impl MemoryBlob {
    /// A validated, readable blob.
    pub fn new(hash: impl Into<BlobHash>, data: impl Into<Bytes>) -> Self {
        Self {
            hash: hash.into(),
            data: data.into(),
            validated: true,
            openable: true,
            behaviour: ReadBehaviour::Normal,
            tracker: Arc::new(HandleTracker::new()),
        }
    }

    /// Mark the blob as not validated.
    pub fn unvalidated(mut self) -> Self {
        self.validated = false;
        self
    }

    /// Make read-handle acquisition fail.
    pub fn unopenable(mut self) -> Self {
        self.openable = false;
        self
    }

    /// Change how read handles deliver content.
    pub fn with_read_behaviour(mut self, behaviour: ReadBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Report handle activity to `tracker`.
    pub fn with_tracker(mut self, tracker: Arc<HandleTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Handle activity for this blob.
    pub fn tracker(&self) -> &Arc<HandleTracker> {
        &self.tracker
    }

    /// Blob content.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

#[async_trait]
impl BlobFile for MemoryBlob {
    type ReadHandle = MemoryReadHandle;

    fn blob_hash(&self) -> &BlobHash {
        &self.hash
    }

    fn length(&self) -> u64 {
        self.data.len() as u64
    }

    fn is_validated(&self) -> bool {
        self.validated
    }

    async fn open_for_reading(&self) -> Option<MemoryReadHandle> {
        if !self.openable {
            return None;
        }
        self.tracker.on_open();
        Some(MemoryReadHandle {
            data: self.data.clone(),
            pos: 0,
            behaviour: self.behaviour,
        })
    }

    fn close_read_handle(&self, _handle: MemoryReadHandle) {
        self.tracker.on_close();
    }
}

/// Read handle over an in-memory blob.
#[derive(Debug)]
pub struct MemoryReadHandle {
    data: Bytes,
    pos: usize,
    behaviour: ReadBehaviour,
}

impl MemoryReadHandle {
    /// Bytes handed out so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl AsyncRead for MemoryReadHandle {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let len = this.data.len();
        let limit = match this.behaviour {
            ReadBehaviour::Normal => len,
            ReadBehaviour::StallAfter(n) | ReadBehaviour::FailAfter(n) => n.min(len),
        };

        if this.pos >= limit {
            if this.pos >= len {
                return Poll::Ready(Ok(0));
            }
            return match this.behaviour {
                // Woken only by whoever aborts or times out the transfer.
                ReadBehaviour::StallAfter(_) => Poll::Pending,
                ReadBehaviour::FailAfter(_) => {
                    Poll::Ready(Err(io::Error::other("injected read failure")))
                }
                ReadBehaviour::Normal => Poll::Ready(Ok(0)),
            };
        }

        let n = (limit - this.pos).min(buf.len());
        let chunk = this.data.slice(this.pos..this.pos + n);
        if let Some(dst) = buf.get_mut(..n) {
            dst.copy_from_slice(&chunk);
        }
        this.pos += n;
        Poll::Ready(Ok(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::AsyncReadExt;

    #[tokio::test]
    async fn test_read_all_and_track() {
        let blob = MemoryBlob::new("x", vec![7u8; 100]);
        let mut handle = blob.open_for_reading().await.unwrap();

        let mut out = Vec::new();
        handle.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, vec![7u8; 100]);
        assert_eq!(blob.tracker().open_now(), 1);

        blob.close_read_handle(handle);
        assert_eq!(blob.tracker().opened(), 1);
        assert_eq!(blob.tracker().closed(), 1);
        assert_eq!(blob.tracker().open_now(), 0);
    }

    #[tokio::test]
    async fn test_fail_after() {
        let blob = MemoryBlob::new("x", vec![1u8; 100]).with_read_behaviour(ReadBehaviour::FailAfter(40));
        let mut handle = blob.open_for_reading().await.unwrap();

        let mut buf = [0u8; 64];
        assert_eq!(handle.read(&mut buf).await.unwrap(), 40);
        assert!(handle.read(&mut buf).await.is_err());
        blob.close_read_handle(handle);
    }

    #[tokio::test]
    async fn test_unopenable() {
        let blob = MemoryBlob::new("x", vec![1u8; 10]).unopenable();
        assert!(blob.open_for_reading().await.is_none());
        assert_eq!(blob.tracker().opened(), 0);
    }
}
