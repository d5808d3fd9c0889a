//! Remote peer identity and connection-scoped transfer statistics.
//!
//! Statistics use atomic counters so the connection and every handler it
//! spawns can record transfers without locking.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Transfer statistic tracked per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PeerStat {
    /// Blob payload bytes sent to the peer.
    BlobBytesUploaded,
    /// Blobs sent to the peer.
    BlobsUploaded,
    /// Blob payload bytes received from the peer.
    BlobBytesDownloaded,
    /// Blobs received from the peer.
    BlobsDownloaded,
}

/// Connection-scoped transfer counters.
#[derive(Debug, Default)]
pub struct PeerStats {
    blob_bytes_uploaded: AtomicU64,
    blobs_uploaded: AtomicU64,
    blob_bytes_downloaded: AtomicU64,
    blobs_downloaded: AtomicU64,
}

impl PeerStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a counter.
    pub fn update_stats(&self, stat: PeerStat, amount: u64) {
        self.counter(stat).fetch_add(amount, Ordering::Relaxed);
    }

    /// Current value of a counter.
    pub fn get(&self, stat: PeerStat) -> u64 {
        self.counter(stat).load(Ordering::Relaxed)
    }

    /// Bytes uploaded to the peer.
    pub fn blob_bytes_uploaded(&self) -> u64 {
        self.get(PeerStat::BlobBytesUploaded)
    }

    /// Blobs uploaded to the peer.
    pub fn blobs_uploaded(&self) -> u64 {
        self.get(PeerStat::BlobsUploaded)
    }

    fn counter(&self, stat: PeerStat) -> &AtomicU64 {
        match stat {
            PeerStat::BlobBytesUploaded => &self.blob_bytes_uploaded,
            PeerStat::BlobsUploaded => &self.blobs_uploaded,
            PeerStat::BlobBytesDownloaded => &self.blob_bytes_downloaded,
            PeerStat::BlobsDownloaded => &self.blobs_downloaded,
        }
    }
}

/// A remote peer as seen by one connection. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Peer {
    address: SocketAddr,
    stats: Arc<PeerStats>,
}

impl Peer {
    /// Create a peer with fresh statistics.
    pub fn new(address: SocketAddr) -> Self {
        Self::with_stats(address, Arc::new(PeerStats::new()))
    }

    /// Create a peer sharing statistics owned by the connection.
    pub fn with_stats(address: SocketAddr, stats: Arc<PeerStats>) -> Self {
        Self { address, stats }
    }

    /// Socket address of the peer.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Host part of the peer address.
    pub fn host(&self) -> IpAddr {
        self.address.ip()
    }

    /// Shared transfer statistics.
    pub fn stats(&self) -> &Arc<PeerStats> {
        &self.stats
    }

    /// Record a transfer statistic for this peer.
    pub fn update_stats(&self, stat: PeerStat, amount: u64) {
        self.stats.update_stats(stat, amount);
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}
