//! Upload history and expected-payment billing.

use tracing::{debug, warn};
use vertex_blob_api::{
    BlobHandlerConfig, BlobManager, BlobResult, NegotiationStrategy, PaymentLedger,
};
use vertex_blob_net_query::ResponseBatch;
use vertex_blob_primitives::{PaymentRate, Peer};

use crate::{BlobRequestHandler, service::ServiceReply};

impl<M, S, L, C> BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    /// Append the upload history record for a freshly created session.
    ///
    /// If the record cannot be written the session is released before the
    /// error is returned.
    pub(crate) async fn record_upload(&self, reply: ServiceReply) -> BlobResult<ResponseBatch> {
        let ServiceReply {
            response,
            uploading,
        } = reply;
        // A session only exists once a rate was accepted, and rates are never unset.
        let (Some(hash), Some(rate)) = (uploading, self.negotiated_rate()) else {
            return Ok(response);
        };

        if let Err(e) = self
            .manager
            .add_blob_to_upload_history(&hash, self.peer.host(), rate)
            .await
        {
            warn!(peer = %self.peer, blob = %hash, error = %e, "failed to record upload, releasing session");
            self.release_session();
            return Err(e);
        }

        debug!(peer = %self.peer, blob = %hash, %rate, "upload recorded");
        Ok(response)
    }
}

/// Register the payment owed for `bytes` delivered to `peer`.
///
/// Returns the amount billed, or `None` when nothing was sent or no rate is
/// in effect.
pub(crate) fn bill_transfer<L: PaymentLedger + ?Sized>(
    ledger: &L,
    peer: &Peer,
    rate: Option<PaymentRate>,
    bytes: u64,
) -> Option<f64> {
    if bytes == 0 {
        return None;
    }
    let Some(rate) = rate else {
        warn!(%peer, bytes, "no payment rate in effect, upload not billed");
        return None;
    };

    let amount = rate.expected_payment(bytes);
    ledger.add_expected_payment(peer, amount);
    debug!(%peer, bytes, %rate, amount, "expected payment registered");
    Some(amount)
}
