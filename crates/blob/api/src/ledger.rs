//! Expected-payment bookkeeping.

use vertex_blob_primitives::Peer;

/// Records payments peers are expected to make for uploaded data.
///
/// Called from transfer cleanup, so it must not block or suspend.
#[auto_impl::auto_impl(&, Arc)]
pub trait PaymentLedger: Send + Sync {
    /// Register `amount` as owed by `peer`.
    fn add_expected_payment(&self, peer: &Peer, amount: f64);
}
