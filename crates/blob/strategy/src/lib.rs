//! Rate negotiation strategies for blob uploads.
//!
//! A strategy decides whether a peer's offered rate is acceptable. The request
//! handler only applies the outcome; all pricing policy lives here.
//!
//! - [`FixedRateStrategy`] - Accepts offers at or above a minimum rate
//! - [`AcceptAllStrategy`] - Accepts every offer (private or free networks)

#[cfg(feature = "cli")]
mod args;
mod constants;
mod fixed;

#[cfg(feature = "cli")]
pub use args::{StrategyArgs, StrategyKind};
pub use constants::DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE;
pub use fixed::FixedRateStrategy;

use async_trait::async_trait;
use vertex_blob_api::NegotiationStrategy;
use vertex_blob_primitives::{BlobHash, NegotiationOutcome, Offer, Peer};

/// Strategy that accepts every offer at the offered rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllStrategy;

#[async_trait]
impl NegotiationStrategy for AcceptAllStrategy {
    async fn respond_to_offer(
        &self,
        offer: &Offer,
        _peer: &Peer,
        _available_blobs: &[BlobHash],
    ) -> NegotiationOutcome {
        NegotiationOutcome::accept(offer.rate())
    }
}

/// Strategy selected at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredStrategy {
    /// Minimum-rate policy.
    Fixed(FixedRateStrategy),
    /// Accept everything.
    AcceptAll(AcceptAllStrategy),
}

#[async_trait]
impl NegotiationStrategy for ConfiguredStrategy {
    async fn respond_to_offer(
        &self,
        offer: &Offer,
        peer: &Peer,
        available_blobs: &[BlobHash],
    ) -> NegotiationOutcome {
        match self {
            Self::Fixed(s) => s.respond_to_offer(offer, peer, available_blobs).await,
            Self::AcceptAll(s) => s.respond_to_offer(offer, peer, available_blobs).await,
        }
    }
}
