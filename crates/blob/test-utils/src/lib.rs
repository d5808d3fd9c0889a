//! Test utilities and mocks for the blob exchange crates.
//!
//! - [`MemoryBlobManager`] / [`MemoryBlob`] - In-memory storage with
//!   injectable failures and read-handle balance tracking
//! - [`ScriptedStrategy`] - Negotiation strategy with queued answers that
//!   records what it was asked
//! - [`FailingWriter`] - Sink that breaks after a number of bytes

mod blob;
mod io;
mod manager;
mod strategy;

pub use blob::{HandleTracker, MemoryBlob, MemoryReadHandle, ReadBehaviour};
pub use io::FailingWriter;
pub use manager::{MemoryBlobManager, UploadRecord};
pub use strategy::{ScriptedStrategy, StrategyCall};

use std::net::SocketAddr;
use vertex_blob_primitives::Peer;

/// A peer on localhost with fresh statistics.
pub fn test_peer() -> Peer {
    Peer::new(SocketAddr::from(([127, 0, 0, 1], 3333)))
}

/// Deterministic blob content of `len` bytes.
pub fn blob_content(len: usize) -> bytes::Bytes {
    (0..len).map(|i| (i % 251) as u8).collect::<Vec<u8>>().into()
}
