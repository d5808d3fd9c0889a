//! Rate offers and negotiation outcomes.
//!
//! A remote peer proposes a [`Offer`]; the negotiation strategy answers with a
//! [`NegotiationOutcome`], which is sent back to the peer as a
//! [`NegotiationReply`].

use serde::{Deserialize, Serialize};

use crate::PaymentRate;

/// Decimal places an offered rate is rounded to.
const OFFER_PRECISION: f64 = 100_000.0;

/// A rate proposed by the remote peer for future blob transfers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offer {
    rate: PaymentRate,
}

impl Offer {
    /// Create an offer, rounding the rate to 5 decimal places.
    pub fn new(rate: f64) -> Self {
        Self {
            rate: PaymentRate::new((rate * OFFER_PRECISION).round() / OFFER_PRECISION),
        }
    }

    /// The offered rate.
    pub fn rate(&self) -> PaymentRate {
        self.rate
    }
}

/// Wire status of a negotiation round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    /// The offered rate is now in effect.
    RateAccepted,
    /// The offered rate was refused.
    RateTooLow,
}

/// Decision returned by a negotiation strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiationOutcome {
    /// Whether the offer was accepted.
    pub accepted: bool,
    /// The accepted rate, or the strategy's counter when rejected.
    pub rate: PaymentRate,
}

impl NegotiationOutcome {
    /// Accept at the given rate.
    pub fn accept(rate: PaymentRate) -> Self {
        Self {
            accepted: true,
            rate,
        }
    }

    /// Reject, quoting the rate the strategy would accept.
    pub fn reject(counter: PaymentRate) -> Self {
        Self {
            accepted: false,
            rate: counter,
        }
    }

    /// Wire status for this outcome.
    pub fn status(&self) -> OfferStatus {
        if self.accepted {
            OfferStatus::RateAccepted
        } else {
            OfferStatus::RateTooLow
        }
    }

    /// Serialize into the response fields sent back to the peer.
    pub fn to_reply(&self) -> NegotiationReply {
        NegotiationReply {
            status: self.status(),
            rate: self.rate,
        }
    }
}

/// Negotiation fields merged into a query response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NegotiationReply {
    /// Accepted / too low.
    #[serde(rename = "blob_data_payment_rate")]
    pub status: OfferStatus,
    /// Effective rate of the outcome.
    #[serde(rename = "payment_rate")]
    pub rate: PaymentRate,
}

impl NegotiationReply {
    /// Whether the peer's offer was accepted.
    pub fn is_accepted(&self) -> bool {
        self.status == OfferStatus::RateAccepted
    }
}
