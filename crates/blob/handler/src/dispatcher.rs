//! Staged dispatch of one query batch.

use strum::IntoEnumIterator;
use tracing::debug;
use vertex_blob_api::{
    BlobHandlerConfig, BlobManager, BlobResult, NegotiationStrategy, PaymentLedger,
};
use vertex_blob_net_query::{QueryBatch, QueryKey, ResponseBatch};
use vertex_blob_primitives::Offer;

use crate::BlobRequestHandler;

/// Wire keys answered by the handler.
pub const QUERY_IDENTIFIERS: &[&str] = &["blob_data_payment_rate", "requested_blob", "requested_blobs"];

/// Stages of query handling, in execution order.
///
/// Availability runs first so the strategy can price against it; negotiation
/// runs before download because an accepted rate gates the download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum QueryStage {
    /// Which requested blobs are available.
    Availability,
    /// Answer the rate offer.
    Negotiation,
    /// Open the requested blob for upload.
    Download,
}

impl QueryStage {
    /// Key that triggers this stage.
    pub const fn key(&self) -> QueryKey {
        match self {
            Self::Availability => QueryKey::RequestedBlobs,
            Self::Negotiation => QueryKey::PaymentRate,
            Self::Download => QueryKey::RequestedBlob,
        }
    }
}

impl<M, S, L, C> BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    /// Run every stage whose key is present, accumulating one response.
    pub(crate) async fn dispatch(&self, queries: QueryBatch) -> BlobResult<ResponseBatch> {
        self.metrics.inc_queries();

        let mut response = ResponseBatch::new();
        for stage in QueryStage::iter() {
            if !queries.contains(stage.key()) {
                continue;
            }
            debug!(peer = %self.peer, %stage, "running query stage");
            response = self.run_stage(stage, &queries, response).await?;
        }
        Ok(response)
    }

    async fn run_stage(
        &self,
        stage: QueryStage,
        queries: &QueryBatch,
        mut response: ResponseBatch,
    ) -> BlobResult<ResponseBatch> {
        match stage {
            QueryStage::Availability => {
                if let Some(requested) = &queries.requested_blobs {
                    response.available_blobs = Some(self.resolve_availability(requested).await?);
                }
                Ok(response)
            }
            QueryStage::Negotiation => {
                if let Some(rate) = queries.payment_rate {
                    let available = response.available_blobs.as_deref().unwrap_or_default();
                    let outcome = self.negotiate(Offer::new(rate), available).await;
                    response.negotiation = Some(outcome.to_reply());
                }
                Ok(response)
            }
            QueryStage::Download => match &queries.requested_blob {
                Some(requested) => {
                    let reply = self.service_download(requested, response).await?;
                    self.record_upload(reply).await
                }
                None => Ok(response),
            },
        }
    }
}
