//! Negotiation stage.

use tracing::info;
use vertex_blob_api::{BlobHandlerConfig, BlobManager, NegotiationStrategy, PaymentLedger};
use vertex_blob_primitives::{BlobHash, NegotiationOutcome, Offer};

use crate::BlobRequestHandler;

impl<M, S, L, C> BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    /// Put `offer` to the strategy and adopt the rate if it is accepted.
    ///
    /// A rejected offer leaves any previously accepted rate in effect.
    pub async fn negotiate(&self, offer: Offer, available_blobs: &[BlobHash]) -> NegotiationOutcome {
        let outcome = self
            .strategy
            .respond_to_offer(&offer, &self.peer, available_blobs)
            .await;

        if outcome.accepted {
            *self.rate.write() = Some(outcome.rate);
        }
        self.metrics.inc_offers(outcome.accepted);

        info!(
            peer = %self.peer,
            offered = %offer.rate(),
            rate = %outcome.rate,
            status = %outcome.status(),
            available = available_blobs.len(),
            "rate offer answered"
        );
        outcome
    }
}
