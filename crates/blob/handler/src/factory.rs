//! Builds one request handler per peer connection.

use std::sync::Arc;

use vertex_blob_api::{
    BlobHandlerConfig, BlobManager, NegotiationStrategy, PaymentLedger, QueryHandlerFactory,
};
use vertex_blob_primitives::Peer;

use crate::{BlobHandlerMetrics, BlobRequestHandler, DefaultBlobHandlerConfig, constants::*};

/// Factory for [`BlobRequestHandler`]s sharing one set of collaborators.
pub struct BlobRequestHandlerFactory<M, S, L, C = DefaultBlobHandlerConfig> {
    manager: Arc<M>,
    strategy: Arc<S>,
    ledger: Arc<L>,
    config: Arc<C>,
    metrics: BlobHandlerMetrics,
}

impl<M, S, L> BlobRequestHandlerFactory<M, S, L>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
{
    /// Create a factory with the default configuration.
    pub fn new(manager: Arc<M>, strategy: Arc<S>, ledger: Arc<L>) -> Self {
        Self {
            manager,
            strategy,
            ledger,
            config: Arc::new(DefaultBlobHandlerConfig),
            metrics: BlobHandlerMetrics::default(),
        }
    }
}

impl<M, S, L, C> BlobRequestHandlerFactory<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    /// Use `config` for every handler built from now on.
    pub fn with_config<C2: BlobHandlerConfig>(
        self,
        config: Arc<C2>,
    ) -> BlobRequestHandlerFactory<M, S, L, C2> {
        BlobRequestHandlerFactory {
            manager: self.manager,
            strategy: self.strategy,
            ledger: self.ledger,
            config,
            metrics: self.metrics,
        }
    }

    /// Shared blob storage.
    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    /// Shared payment ledger.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }
}

impl<M, S, L, C> QueryHandlerFactory for BlobRequestHandlerFactory<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    type Handler = BlobRequestHandler<M, S, L, C>;

    fn build_query_handler(&self, peer: Peer) -> Self::Handler {
        BlobRequestHandler::with_config(
            peer,
            Arc::clone(&self.manager),
            Arc::clone(&self.strategy),
            Arc::clone(&self.ledger),
            Arc::clone(&self.config),
        )
        .with_metrics(self.metrics.clone())
    }

    fn primary_query_identifier(&self) -> &'static str {
        PRIMARY_QUERY_IDENTIFIER
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vertex_blob_api::QueryHandler;
    use vertex_blob_ledger::ExpectedPayments;
    use vertex_blob_primitives::PaymentRate;
    use vertex_blob_test_utils::{MemoryBlobManager, ScriptedStrategy, test_peer};

    use crate::BlobHandlerArgs;

    fn factory() -> BlobRequestHandlerFactory<MemoryBlobManager, ScriptedStrategy, ExpectedPayments>
    {
        BlobRequestHandlerFactory::new(
            Arc::new(MemoryBlobManager::new()),
            Arc::new(ScriptedStrategy::new()),
            Arc::new(ExpectedPayments::new()),
        )
    }

    #[test]
    fn test_registration_metadata() {
        let factory = factory();
        assert_eq!(factory.primary_query_identifier(), "requested_blob");
        assert_eq!(factory.description(), "Blob Uploader - uploads blobs");
    }

    #[tokio::test]
    async fn test_handlers_are_independent() {
        let factory = factory();
        let first = factory.build_query_handler(test_peer());
        let second = factory.build_query_handler(test_peer());

        first.negotiate(vertex_blob_primitives::Offer::new(0.5), &[]).await;
        assert_eq!(first.negotiated_rate(), Some(PaymentRate::new(0.5)));
        assert_eq!(second.negotiated_rate(), None);
        assert_eq!(
            second.query_identifiers(),
            &["blob_data_payment_rate", "requested_blob", "requested_blobs"]
        );
    }

    #[test]
    fn test_with_config() {
        let args = BlobHandlerArgs {
            chunk_size: 4096,
            ..Default::default()
        };
        let factory = factory().with_config(Arc::new(args));
        let handler = factory.build_query_handler(test_peer());
        assert_eq!(handler.config.chunk_size(), 4096);
    }
}
