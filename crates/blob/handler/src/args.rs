//! CLI arguments for blob upload configuration.

use core::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};
use vertex_blob_api::BlobHandlerConfig;

use crate::constants::*;

/// Blob upload CLI arguments.
#[derive(Debug, Args, Clone, Serialize, Deserialize)]
#[command(next_help_heading = "Blob Uploads")]
#[serde(default)]
pub struct BlobHandlerArgs {
    /// Bytes per chunk when streaming a blob
    #[arg(long = "blob.chunk-size", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Abandon an upload when a single read or write makes no progress for
    /// this many seconds (disabled when unset)
    #[arg(long = "blob.stall-timeout-secs")]
    pub stall_timeout_secs: Option<u64>,
}

impl Default for BlobHandlerArgs {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            stall_timeout_secs: None,
        }
    }
}

impl BlobHandlerArgs {
    /// Validate argument values.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("blob.chunk-size must be greater than zero".to_string());
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!("blob.chunk-size must not exceed {MAX_CHUNK_SIZE} bytes"));
        }
        if self.stall_timeout_secs == Some(0) {
            return Err("blob.stall-timeout-secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl BlobHandlerConfig for BlobHandlerArgs {
    fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn stall_timeout(&self) -> Option<Duration> {
        self.stall_timeout_secs.map(Duration::from_secs)
    }
}
