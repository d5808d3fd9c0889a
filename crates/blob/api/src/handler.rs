//! Capabilities the request handler exposes to the transport.

use async_trait::async_trait;
use futures::AsyncWrite;
use vertex_blob_net_query::{QueryBatch, ResponseBatch};
use vertex_blob_primitives::Peer;

use crate::BlobResult;

/// Resolves recognized keys of a query batch into a response.
#[async_trait]
pub trait QueryHandler: Send + Sync {
    /// Wire keys this handler answers.
    fn query_identifiers(&self) -> &'static [&'static str];

    /// Answer one query batch.
    ///
    /// Protocol refusals are reported inside the response; an `Err` means the
    /// exchange failed locally.
    async fn handle_queries(&self, queries: QueryBatch) -> BlobResult<ResponseBatch>;
}

/// Streams a blob to the peer once a response has been sent.
#[async_trait]
pub trait BlobSender: Send + Sync {
    /// Stream the blob prepared by the last download request, if any.
    ///
    /// Polled by the transport after every response. Returns `true` when there
    /// was nothing to send or the blob was fully delivered, `false` when the
    /// transfer failed or was cancelled. Never fails: by the time streaming
    /// starts the response has already been delivered.
    async fn send_blob_if_requested<W>(&self, consumer: &mut W) -> bool
    where
        W: AsyncWrite + Unpin + Send;

    /// Abandon any pending or in-flight upload and hand `reason` back.
    ///
    /// Idempotent; safe to call when nothing is being sent.
    fn cancel_send<E>(&self, reason: E) -> E;
}

/// Builds a query handler for each new peer connection.
pub trait QueryHandlerFactory: Send + Sync {
    /// Handler type produced.
    type Handler: QueryHandler + BlobSender;

    /// Build a handler bound to `peer`.
    fn build_query_handler(&self, peer: Peer) -> Self::Handler;

    /// The key that identifies this handler's protocol.
    fn primary_query_identifier(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;
}
