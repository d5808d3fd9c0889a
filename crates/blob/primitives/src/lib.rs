//! Core primitive types for the blob exchange protocol.
//!
//! These types are shared by the wire schema, the collaborator traits and the
//! request handler, kept separate to avoid circular dependencies.

mod hash;
mod offer;
mod peer;
mod rate;

pub use hash::BlobHash;
pub use offer::{NegotiationOutcome, NegotiationReply, Offer, OfferStatus};
pub use peer::{Peer, PeerStat, PeerStats};
pub use rate::{BYTES_PER_MB, PaymentRate};
