//! Minimum-rate negotiation.

use async_trait::async_trait;
use tracing::debug;
use vertex_blob_api::NegotiationStrategy;
use vertex_blob_primitives::{BlobHash, NegotiationOutcome, Offer, PaymentRate, Peer};

use crate::constants::DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE;

/// Accepts offers at or above a fixed minimum rate.
///
/// Accepted offers take effect at the offered rate; rejected ones are
/// answered with the minimum so the peer knows what to offer next.
#[derive(Debug, Clone, Copy)]
pub struct FixedRateStrategy {
    min_rate: PaymentRate,
}

impl FixedRateStrategy {
    /// Create a strategy with the given minimum rate per megabyte.
    pub fn new(min_rate: PaymentRate) -> Self {
        Self { min_rate }
    }

    /// The minimum accepted rate.
    pub fn min_rate(&self) -> PaymentRate {
        self.min_rate
    }
}

impl Default for FixedRateStrategy {
    fn default() -> Self {
        Self::new(PaymentRate::new(DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE))
    }
}

#[async_trait]
impl NegotiationStrategy for FixedRateStrategy {
    async fn respond_to_offer(
        &self,
        offer: &Offer,
        peer: &Peer,
        available_blobs: &[BlobHash],
    ) -> NegotiationOutcome {
        let accepted = offer.rate() >= self.min_rate;
        debug!(
            %peer,
            offered = %offer.rate(),
            min = %self.min_rate,
            blobs = available_blobs.len(),
            accepted,
            "Evaluated rate offer"
        );
        if accepted {
            NegotiationOutcome::accept(offer.rate())
        } else {
            NegotiationOutcome::reject(self.min_rate)
        }
    }
}
