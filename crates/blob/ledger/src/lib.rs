//! In-memory expected-payment ledger.
//!
//! Tracks, per peer, how much the peer is expected to pay for blob data we
//! uploaded and how much it has actually paid. Nothing is persisted.
//!
//! # Components
//!
//! - [`ExpectedPayments`] - Per-peer account factory, implements [`PaymentLedger`]
//! - [`PeerAccount`] - Atomic per-peer counters
//!
//! [`PaymentLedger`]: vertex_blob_api::PaymentLedger

mod account;
mod error;

pub use account::{PeerAccount, PeerAccountSnapshot};
pub use error::LedgerError;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, warn};
use vertex_blob_api::PaymentLedger;
use vertex_blob_primitives::Peer;

/// Per-peer expected-payment accounts.
#[derive(Default)]
pub struct ExpectedPayments {
    peers: RwLock<HashMap<SocketAddr, Arc<PeerAccount>>>,
}

impl ExpectedPayments {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the account for a peer (double-checked locking).
    pub fn get_or_create_peer(&self, peer: SocketAddr) -> Arc<PeerAccount> {
        // Fast path: read lock
        if let Some(account) = self.peers.read().get(&peer) {
            return Arc::clone(account);
        }

        // Slow path: write lock
        self.peers
            .write()
            .entry(peer)
            .or_insert_with(|| Arc::new(PeerAccount::new(peer)))
            .clone()
    }

    /// Account for a peer, if one exists.
    pub fn account(&self, peer: &SocketAddr) -> Option<Arc<PeerAccount>> {
        self.peers.read().get(peer).cloned()
    }

    /// Total payment expected from a peer so far.
    pub fn expected_payment(&self, peer: &SocketAddr) -> f64 {
        self.account(peer).map_or(0.0, |a| a.expected())
    }

    /// Amount the peer still owes.
    pub fn outstanding(&self, peer: &SocketAddr) -> f64 {
        self.account(peer).map_or(0.0, |a| a.outstanding())
    }

    /// Record a payment received from a peer.
    pub fn record_payment(&self, peer: &SocketAddr, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let account = self
            .account(peer)
            .ok_or(LedgerError::PeerNotFound(*peer))?;
        account.add_received(amount);
        debug!(%peer, amount, outstanding = account.outstanding(), "Payment received");
        Ok(())
    }

    /// All peers with an account.
    pub fn peers(&self) -> Vec<SocketAddr> {
        self.peers.read().keys().copied().collect()
    }

    /// Drop a peer's account.
    pub fn remove_peer(&self, peer: &SocketAddr) -> Option<PeerAccountSnapshot> {
        self.peers.write().remove(peer).map(|a| a.snapshot())
    }

    /// Sum of all outstanding balances.
    pub fn total_outstanding(&self) -> f64 {
        self.peers.read().values().map(|a| a.outstanding()).sum()
    }
}

impl PaymentLedger for ExpectedPayments {
    fn add_expected_payment(&self, peer: &Peer, amount: f64) {
        if !amount.is_finite() || amount < 0.0 {
            warn!(%peer, amount, "Ignoring invalid expected payment");
            return;
        }
        let account = self.get_or_create_peer(peer.address());
        account.add_expected(amount);
        debug!(%peer, amount, expected = account.expected(), "Expected payment registered");
    }
}
