//! Configuration traits for the request handler.

use core::time::Duration;

/// Configuration consumed by the request handler.
#[auto_impl::auto_impl(&, Arc)]
pub trait BlobHandlerConfig: Send + Sync {
    /// Maximum number of bytes read and written per chunk when streaming.
    fn chunk_size(&self) -> usize;

    /// How long a single read or write may make no progress before the
    /// transfer is abandoned. `None` waits indefinitely.
    fn stall_timeout(&self) -> Option<Duration>;
}
