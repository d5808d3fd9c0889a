//! Download servicing: turns a download request into an upload session.

use tracing::{debug, warn};
use vertex_blob_api::{
    BlobError, BlobFile, BlobHandlerConfig, BlobManager, BlobResult, NegotiationStrategy,
    PaymentLedger,
};
use vertex_blob_net_query::{IncomingBlob, ResponseBatch, ResponseError};
use vertex_blob_primitives::BlobHash;

use crate::{
    BlobRequestHandler,
    session::{SessionSlot, TransferSession},
};

/// Response of the download stage together with the blob now queued for
/// upload, if any.
#[derive(Debug)]
pub(crate) struct ServiceReply {
    pub(crate) response: ResponseBatch,
    pub(crate) uploading: Option<BlobHash>,
}

impl ServiceReply {
    fn refused(mut response: ResponseBatch, reason: ResponseError) -> Self {
        response.error = Some(reason);
        Self {
            response,
            uploading: None,
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
    /// Open `requested` for upload and describe it in `response`.
    ///
    /// Refusals (`RATE_UNSET`, `BLOB_UNAVAILABLE`) land in the response, and an
    /// unknown blob is refused as unavailable. Only storage failures are errors.
    pub(crate) async fn service_download(
        &self,
        requested: &BlobHash,
        response: ResponseBatch,
    ) -> BlobResult<ServiceReply> {
        if self.negotiated_rate().is_none() {
            return Ok(self.refuse(requested, response, ResponseError::RateUnset));
        }
        if self.has_session() {
            debug!(peer = %self.peer, blob = %requested, "upload already pending");
            return Ok(self.refuse(requested, response, ResponseError::BlobUnavailable));
        }

        let blob = match self.manager.get_blob(requested).await {
            Ok(blob) => blob,
            Err(BlobError::NotFound { .. }) => {
                return Ok(self.refuse(requested, response, ResponseError::BlobUnavailable));
            }
            Err(e) => return Err(e),
        };
        if !blob.is_validated() {
            return Ok(self.refuse(requested, response, ResponseError::BlobUnavailable));
        }
        let Some(handle) = blob.open_for_reading().await else {
            return Ok(self.refuse(requested, response, ResponseError::BlobUnavailable));
        };

        let incoming = IncomingBlob {
            blob_hash: blob.blob_hash().clone(),
            length: blob.length(),
        };
        let session = TransferSession::open(blob, handle);

        let rejected = {
            let mut slot = self.session.lock();
            if slot.is_idle() {
                *slot = SessionSlot::Ready(session);
                None
            } else {
                Some(session)
            }
        };
        if let Some(session) = rejected {
            // Lost the slot to a concurrent request; dropping closes the handle.
            drop(session);
            return Ok(self.refuse(requested, response, ResponseError::BlobUnavailable));
        }

        debug!(peer = %self.peer, blob = %incoming.blob_hash, length = incoming.length, "upload session opened");
        let mut response = response;
        response.incoming_blob = Some(incoming);
        Ok(ServiceReply {
            response,
            uploading: Some(requested.clone()),
        })
    }

    fn refuse(
        &self,
        requested: &BlobHash,
        response: ResponseBatch,
        reason: ResponseError,
    ) -> ServiceReply {
        warn!(peer = %self.peer, blob = %requested, %reason, "download request refused");
        self.metrics.inc_refused(reason);
        ServiceReply::refused(response, reason)
    }
}
