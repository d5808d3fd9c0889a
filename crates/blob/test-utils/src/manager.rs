//! In-memory blob manager.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use vertex_blob_api::{BlobError, BlobFile, BlobManager, BlobResult};
use vertex_blob_primitives::{BlobHash, PaymentRate};

use crate::{HandleTracker, MemoryBlob};

/// One entry of the upload history.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    /// Blob uploaded.
    pub hash: BlobHash,
    /// Peer host it was uploaded to.
    pub host: IpAddr,
    /// Negotiated rate at the time.
    pub rate: PaymentRate,
}

/// Blob manager keeping everything in memory.
///
/// All blobs inserted share one [`HandleTracker`], so handle balance can be
/// checked across a whole test.
#[derive(Debug, Default)]
pub struct MemoryBlobManager {
    blobs: RwLock<HashMap<BlobHash, MemoryBlob>>,
    history: Mutex<Vec<UploadRecord>>,
    tracker: Arc<HandleTracker>,
    fail_lookups: AtomicBool,
    fail_history: AtomicBool,
    lookups: AtomicUsize,
}

impl MemoryBlobManager {
    /// Empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob, binding it to this manager's handle tracker.
    pub fn insert(&self, blob: MemoryBlob) {
        let blob = blob.with_tracker(Arc::clone(&self.tracker));
        self.blobs.write().insert(blob.blob_hash().clone(), blob);
    }

    /// Store a validated blob with the given content.
    pub fn insert_validated(&self, hash: impl Into<BlobHash>, data: impl Into<Bytes>) {
        self.insert(MemoryBlob::new(hash, data));
    }

    /// Handle activity across all blobs.
    pub fn tracker(&self) -> &Arc<HandleTracker> {
        &self.tracker
    }

    /// Upload history appended so far.
    pub fn history(&self) -> Vec<UploadRecord> {
        self.history.lock().clone()
    }

    /// Number of `get_blob` calls served.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make lookups fail with a storage error.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Make history appends fail with a storage error.
    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    fn check_lookups(&self) -> BlobResult<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(BlobError::storage("injected lookup failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobManager for MemoryBlobManager {
    type Blob = MemoryBlob;

    async fn completed_blobs(&self, hashes: &[BlobHash]) -> BlobResult<Vec<BlobHash>> {
        self.check_lookups()?;
        let blobs = self.blobs.read();
        Ok(hashes
            .iter()
            .filter(|h| blobs.get(*h).is_some_and(|b| b.is_validated()))
            .cloned()
            .collect())
    }

    async fn get_blob(&self, hash: &BlobHash) -> BlobResult<MemoryBlob> {
        self.check_lookups()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.blobs
            .read()
            .get(hash)
            .cloned()
            .ok_or_else(|| BlobError::NotFound { hash: hash.clone() })
    }

    async fn add_blob_to_upload_history(
        &self,
        hash: &BlobHash,
        host: IpAddr,
        rate: PaymentRate,
    ) -> BlobResult<()> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(BlobError::storage("injected history failure"));
        }
        self.history.lock().push(UploadRecord {
            hash: hash.clone(),
            host,
            rate,
        });
        Ok(())
    }
}
