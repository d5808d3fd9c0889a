//! Availability stage.

use std::collections::HashSet;

use tracing::debug;
use vertex_blob_api::{
    BlobHandlerConfig, BlobManager, BlobResult, NegotiationStrategy, PaymentLedger,
};
use vertex_blob_primitives::BlobHash;

use crate::BlobRequestHandler;

impl<M, S, L, C> BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    /// The requested blobs that are stored and validated locally.
    ///
    /// Keeps request order and drops duplicates. Unknown hashes are simply
    /// left out; only a failing storage lookup is an error.
    pub async fn resolve_availability(&self, requested: &[BlobHash]) -> BlobResult<Vec<BlobHash>> {
        let completed: HashSet<BlobHash> =
            self.manager.completed_blobs(requested).await?.into_iter().collect();

        let mut seen = HashSet::with_capacity(completed.len());
        let available: Vec<BlobHash> = requested
            .iter()
            .filter(|hash| completed.contains(*hash) && seen.insert(*hash))
            .cloned()
            .collect();

        debug!(
            peer = %self.peer,
            requested = requested.len(),
            available = available.len(),
            "resolved blob availability"
        );
        Ok(available)
    }
}
