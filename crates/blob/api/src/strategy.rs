//! Rate negotiation policy.

use async_trait::async_trait;
use vertex_blob_primitives::{BlobHash, NegotiationOutcome, Offer, Peer};

/// Pricing policy answering a peer's rate offer.
///
/// Injected into every handler at construction; shared across connections.
#[async_trait]
pub trait NegotiationStrategy: Send + Sync + 'static {
    /// Decide on `offer` from `peer`, given the blobs we just told the peer
    /// are available (empty if the batch did not ask).
    async fn respond_to_offer(
        &self,
        offer: &Offer,
        peer: &Peer,
        available_blobs: &[BlobHash],
    ) -> NegotiationOutcome;
}
