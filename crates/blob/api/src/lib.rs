//! Blob API - capability contracts for the blob exchange protocol.
//!
//! The request handler serving one peer connection depends on three shared
//! collaborators and exposes two capabilities to the transport.
//!
//! # Collaborators
//!
//! - [`BlobManager`] / [`BlobFile`] - Local blob storage, validation and read handles
//! - [`NegotiationStrategy`] - Pricing policy answering rate offers
//! - [`PaymentLedger`] - Records payments expected from peers
//!
//! # Capabilities
//!
//! - [`QueryHandler`] - Resolves the recognized keys of a query batch
//! - [`BlobSender`] - Streams the requested blob after each response
//! - [`QueryHandlerFactory`] - Builds one handler per connection
//!
//! # Design Principles
//!
//! - Collaborators are shared across connections and must be `Send + Sync`
//! - Anything that may suspend is `async`; release paths are synchronous so
//!   they can run from `Drop`
//! - No transport concepts leak into the API beyond `futures::AsyncWrite`

#![warn(missing_docs)]

mod config;
mod error;
mod handler;
mod ledger;
mod storage;
mod strategy;

pub use config::BlobHandlerConfig;
pub use error::{BlobError, BlobResult};
pub use handler::{BlobSender, QueryHandler, QueryHandlerFactory};
pub use ledger::PaymentLedger;
pub use storage::{BlobFile, BlobManager};
pub use strategy::NegotiationStrategy;

// Re-export the types every implementor needs.
pub use vertex_blob_net_query::{QueryBatch, ResponseBatch};
pub use vertex_blob_primitives::{
    BlobHash, NegotiationOutcome, Offer, PaymentRate, Peer, PeerStat, PeerStats,
};
