//! Blob request handler - the uploader side of the blob exchange protocol.
//!
//! One [`BlobRequestHandler`] serves one peer connection. Each query batch
//! runs through three stages in a fixed order, accumulating one response:
//!
//! 1. **Availability** (`requested_blobs`) - which requested blobs are stored
//!    and validated locally
//! 2. **Negotiation** (`blob_data_payment_rate`) - the strategy answers the
//!    peer's rate offer; an accepted rate stays in effect for the connection
//! 3. **Download** (`requested_blob`) - opens the blob and queues it for
//!    upload, refusing with `RATE_UNSET` or `BLOB_UNAVAILABLE`
//!
//! After the response is sent, the transport calls
//! [`send_blob_if_requested`](vertex_blob_api::BlobSender::send_blob_if_requested),
//! which streams the queued blob in chunks and bills the peer for the bytes
//! delivered, however the transfer ends.
//!
//! # Components
//!
//! - [`BlobRequestHandler`] - Query dispatch, negotiation and upload state
//! - [`TransferSession`] - The single pending upload and its read handle
//! - [`BlobRequestHandlerFactory`] - Builds handlers sharing storage, strategy and ledger
//! - [`BlobHandlerArgs`] / [`DefaultBlobHandlerConfig`] - Chunk size and stall timeout
//! - [`BlobHandlerMetrics`] - Query, negotiation and upload counters

mod args;
mod availability;
mod billing;
mod config;
pub mod constants;
mod dispatcher;
mod error;
mod factory;
mod handler;
mod metrics;
mod negotiation;
mod service;
mod session;
mod transmitter;

pub use args::BlobHandlerArgs;
pub use config::DefaultBlobHandlerConfig;
pub use dispatcher::{QUERY_IDENTIFIERS, QueryStage};
pub use error::TransferError;
pub use factory::BlobRequestHandlerFactory;
pub use handler::BlobRequestHandler;
pub use metrics::BlobHandlerMetrics;
pub use session::TransferSession;
