#![allow(dead_code)]

use std::sync::Arc;

use vertex_blob_api::BlobHandlerConfig;
use vertex_blob_handler::{BlobRequestHandler, DefaultBlobHandlerConfig};
use vertex_blob_ledger::ExpectedPayments;
use vertex_blob_test_utils::{MemoryBlobManager, ScriptedStrategy, test_peer};

pub type TestHandler<C = DefaultBlobHandlerConfig> =
    BlobRequestHandler<MemoryBlobManager, ScriptedStrategy, ExpectedPayments, C>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Shared collaborators plus one handler built on them.
pub struct Fixture<C: BlobHandlerConfig = DefaultBlobHandlerConfig> {
    pub manager: Arc<MemoryBlobManager>,
    pub strategy: Arc<ScriptedStrategy>,
    pub ledger: Arc<ExpectedPayments>,
    pub handler: Arc<TestHandler<C>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(DefaultBlobHandlerConfig)
    }
}

impl<C: BlobHandlerConfig + 'static> Fixture<C> {
    pub fn with_config(config: C) -> Self {
        let manager = Arc::new(MemoryBlobManager::new());
        let strategy = Arc::new(ScriptedStrategy::new());
        let ledger = Arc::new(ExpectedPayments::new());
        let handler = Arc::new(BlobRequestHandler::with_config(
            test_peer(),
            Arc::clone(&manager),
            Arc::clone(&strategy),
            Arc::clone(&ledger),
            Arc::new(config),
        ));
        Self {
            manager,
            strategy,
            ledger,
            handler,
        }
    }

    /// Payment expected from the handler's peer.
    pub fn expected_payment(&self) -> f64 {
        self.ledger
            .expected_payment(&self.handler.peer().address())
    }
}
