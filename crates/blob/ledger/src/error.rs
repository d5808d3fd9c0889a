//! Ledger error types.

use std::net::SocketAddr;

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Peer has no account.
    #[error("peer {0} not found")]
    PeerNotFound(SocketAddr),

    /// Amount is negative or not a number.
    #[error("invalid payment amount {0}")]
    InvalidAmount(f64),
}
