//! Transfer errors.

use core::time::Duration;

/// Why streaming a blob stopped before the end.
///
/// Never surfaced to the transport: the upload is finalized and billed for
/// the bytes already sent either way.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Reading the blob or writing to the consumer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A single read or write made no progress in time.
    #[error("transfer stalled for {after:?}")]
    Stalled {
        /// Configured stall timeout.
        after: Duration,
    },

    /// The upload was cancelled.
    #[error("transfer cancelled")]
    Cancelled,
}
