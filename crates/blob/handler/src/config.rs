//! Default upload configuration.

use core::time::Duration;

use vertex_blob_api::BlobHandlerConfig;

use crate::constants::*;

/// Default configuration: 16 KiB chunks, no stall timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBlobHandlerConfig;

impl BlobHandlerConfig for DefaultBlobHandlerConfig {
    fn chunk_size(&self) -> usize {
        DEFAULT_CHUNK_SIZE
    }

    fn stall_timeout(&self) -> Option<Duration> {
        None
    }
}
