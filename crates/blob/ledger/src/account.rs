//! Per-peer payment account.
//!
//! Atomic counters let every connection handler record expected payments
//! without locking.

use std::net::SocketAddr;

use portable_atomic::{AtomicF64, AtomicU64, Ordering};

/// Expected and received payments for one peer.
pub struct PeerAccount {
    peer: SocketAddr,
    expected: AtomicF64,
    received: AtomicF64,
    payments: AtomicU64,
}

/// Point-in-time copy of a [`PeerAccount`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerAccountSnapshot {
    /// Total expected.
    pub expected: f64,
    /// Total received.
    pub received: f64,
    /// Number of expected payments registered.
    pub payments: u64,
}

impl PeerAccount {
    /// Create an empty account.
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            expected: AtomicF64::new(0.0),
            received: AtomicF64::new(0.0),
            payments: AtomicU64::new(0),
        }
    }

    /// Address of the peer.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Total payment expected.
    pub fn expected(&self) -> f64 {
        self.expected.load(Ordering::Relaxed)
    }

    /// Total payment received.
    pub fn received(&self) -> f64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Expected minus received.
    pub fn outstanding(&self) -> f64 {
        self.expected() - self.received()
    }

    /// Register an expected payment.
    pub fn add_expected(&self, amount: f64) {
        self.expected.fetch_add(amount, Ordering::Relaxed);
        self.payments.fetch_add(1, Ordering::Relaxed);
    }

    /// Register a received payment.
    pub fn add_received(&self, amount: f64) {
        self.received.fetch_add(amount, Ordering::Relaxed);
    }

    /// Copy the current counters.
    pub fn snapshot(&self) -> PeerAccountSnapshot {
        PeerAccountSnapshot {
            expected: self.expected(),
            received: self.received(),
            payments: self.payments.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_operations() {
        let account = PeerAccount::new(SocketAddr::from(([127, 0, 0, 1], 1)));

        account.add_expected(1.5);
        account.add_expected(0.5);
        account.add_received(0.5);

        assert_eq!(account.expected(), 2.0);
        assert_eq!(account.received(), 0.5);
        assert_eq!(account.outstanding(), 1.5);
        assert_eq!(account.snapshot().payments, 2);
    }
}
