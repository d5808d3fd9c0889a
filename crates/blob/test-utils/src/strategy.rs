//! Negotiation strategy with scripted answers.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use vertex_blob_api::NegotiationStrategy;
use vertex_blob_primitives::{BlobHash, NegotiationOutcome, Offer, PaymentRate, Peer};

/// What the strategy was asked.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyCall {
    /// Offered rate.
    pub offered: PaymentRate,
    /// Blobs the handler had reported as available at the time.
    pub available_blobs: Vec<BlobHash>,
}

/// Answers offers from a queue, accepting at the offered rate once the
/// queue runs dry.
#[derive(Debug, Default)]
pub struct ScriptedStrategy {
    answers: Mutex<VecDeque<NegotiationOutcome>>,
    calls: Mutex<Vec<StrategyCall>>,
}

impl ScriptedStrategy {
    /// Strategy that accepts every offer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next offer.
    pub fn push_answer(&self, outcome: NegotiationOutcome) -> &Self {
        self.answers.lock().push_back(outcome);
        self
    }

    /// Every offer seen so far.
    pub fn calls(&self) -> Vec<StrategyCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NegotiationStrategy for ScriptedStrategy {
    async fn respond_to_offer(
        &self,
        offer: &Offer,
        _peer: &Peer,
        available_blobs: &[BlobHash],
    ) -> NegotiationOutcome {
        self.calls.lock().push(StrategyCall {
            offered: offer.rate(),
            available_blobs: available_blobs.to_vec(),
        });
        self.answers
            .lock()
            .pop_front()
            .unwrap_or_else(|| NegotiationOutcome::accept(offer.rate()))
    }
}
