//! The per-connection request handler.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use vertex_blob_api::{
    BlobHandlerConfig, BlobManager, BlobResult, BlobSender, NegotiationStrategy, PaymentLedger,
    QueryHandler,
};
use vertex_blob_net_query::{QueryBatch, ResponseBatch};
use vertex_blob_primitives::{PaymentRate, Peer};

use crate::{BlobHandlerMetrics, DefaultBlobHandlerConfig, QUERY_IDENTIFIERS, session::SessionSlot};

/// Serves blob queries and uploads for one peer connection.
///
/// Holds the negotiated payment rate and at most one upload session. The
/// storage, strategy and ledger collaborators are shared with every other
/// connection.
pub struct BlobRequestHandler<M: BlobManager, S, L, C = DefaultBlobHandlerConfig> {
    pub(crate) peer: Peer,
    pub(crate) manager: Arc<M>,
    pub(crate) strategy: Arc<S>,
    pub(crate) ledger: Arc<L>,
    pub(crate) config: Arc<C>,
    pub(crate) rate: RwLock<Option<PaymentRate>>,
    pub(crate) session: Mutex<SessionSlot<M::Blob>>,
    pub(crate) metrics: BlobHandlerMetrics,
}

impl<M, S, L> BlobRequestHandler<M, S, L>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
{
    /// Create a handler for `peer` with the default configuration.
    pub fn new(peer: Peer, manager: Arc<M>, strategy: Arc<S>, ledger: Arc<L>) -> Self {
        Self::with_config(peer, manager, strategy, ledger, Arc::new(DefaultBlobHandlerConfig))
    }
}

impl<M, S, L, C> BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    /// Create a handler for `peer`.
    pub fn with_config(
        peer: Peer,
        manager: Arc<M>,
        strategy: Arc<S>,
        ledger: Arc<L>,
        config: Arc<C>,
    ) -> Self {
        Self {
            peer,
            manager,
            strategy,
            ledger,
            config,
            rate: RwLock::new(None),
            session: Mutex::new(SessionSlot::Idle),
            metrics: BlobHandlerMetrics::default(),
        }
    }

    pub(crate) fn with_metrics(mut self, metrics: BlobHandlerMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// The peer this handler serves.
    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    /// Rate accepted in the last successful negotiation, if any.
    pub fn negotiated_rate(&self) -> Option<PaymentRate> {
        *self.rate.read()
    }

    /// Whether an upload is pending or in flight.
    pub fn has_session(&self) -> bool {
        !self.session.lock().is_idle()
    }

    /// Whether an upload is in flight.
    pub fn is_streaming(&self) -> bool {
        self.session.lock().is_streaming()
    }

    /// Bytes delivered by the current upload; zero when there is none.
    pub fn bytes_uploaded(&self) -> u64 {
        self.session.lock().bytes_uploaded()
    }

    /// Drop any pending session and abort an upload in flight.
    pub(crate) fn release_session(&self) {
        self.cancel_send(());
    }
}

#[async_trait]
impl<M, S, L, C> QueryHandler for BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    fn query_identifiers(&self) -> &'static [&'static str] {
        QUERY_IDENTIFIERS
    }

    async fn handle_queries(&self, queries: QueryBatch) -> BlobResult<ResponseBatch> {
        self.dispatch(queries).await
    }
}

impl<M: BlobManager, S, L, C> fmt::Debug for BlobRequestHandler<M, S, L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobRequestHandler")
            .field("peer", &self.peer)
            .field("rate", &*self.rate.read())
            .field("session", &self.session.lock().state())
            .finish_non_exhaustive()
    }
}
