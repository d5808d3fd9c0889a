//! Blob Handler Metrics

use metrics::Counter;
use vertex_blob_net_query::ResponseError;

/// Blob Handler Metrics
#[derive(Clone, Debug)]
pub struct BlobHandlerMetrics {
    /// Number of query batches handled
    pub(crate) queries_total: Counter,
    /// Number of rate offers accepted
    pub(crate) offers_accepted_total: Counter,
    /// Number of rate offers rejected
    pub(crate) offers_rejected_total: Counter,
    /// Download requests refused because no rate was negotiated
    pub(crate) downloads_rate_unset_total: Counter,
    /// Download requests refused because the blob could not be served
    pub(crate) downloads_unavailable_total: Counter,
    /// Number of uploads started
    pub(crate) uploads_started_total: Counter,
    /// Number of uploads streamed to completion
    pub(crate) uploads_completed_total: Counter,
    /// Number of uploads that failed, stalled or were cancelled
    pub(crate) uploads_failed_total: Counter,
    /// Blob bytes written to consumers
    pub(crate) bytes_uploaded_total: Counter,
}

impl Default for BlobHandlerMetrics {
    fn default() -> Self {
        Self {
            queries_total: metrics::counter!("blob.handler.queries_total"),
            offers_accepted_total: metrics::counter!("blob.handler.offers_accepted_total"),
            offers_rejected_total: metrics::counter!("blob.handler.offers_rejected_total"),
            downloads_rate_unset_total: metrics::counter!(
                "blob.handler.downloads_refused_total",
                "reason" => "rate_unset"
            ),
            downloads_unavailable_total: metrics::counter!(
                "blob.handler.downloads_refused_total",
                "reason" => "blob_unavailable"
            ),
            uploads_started_total: metrics::counter!("blob.handler.uploads_started_total"),
            uploads_completed_total: metrics::counter!("blob.handler.uploads_completed_total"),
            uploads_failed_total: metrics::counter!("blob.handler.uploads_failed_total"),
            bytes_uploaded_total: metrics::counter!("blob.handler.bytes_uploaded_total"),
        }
    }
}

impl BlobHandlerMetrics {
    pub(crate) fn inc_queries(&self) {
        self.queries_total.increment(1);
    }

    pub(crate) fn inc_offers(&self, accepted: bool) {
        if accepted {
            self.offers_accepted_total.increment(1);
        } else {
            self.offers_rejected_total.increment(1);
        }
    }

    pub(crate) fn inc_refused(&self, reason: ResponseError) {
        match reason {
            ResponseError::RateUnset => self.downloads_rate_unset_total.increment(1),
            ResponseError::BlobUnavailable => self.downloads_unavailable_total.increment(1),
        }
    }

    pub(crate) fn inc_uploads_started(&self) {
        self.uploads_started_total.increment(1);
    }

    pub(crate) fn inc_uploads_finished(&self, completed: bool) {
        if completed {
            self.uploads_completed_total.increment(1);
        } else {
            self.uploads_failed_total.increment(1);
        }
    }

    pub(crate) fn add_bytes_uploaded(&self, bytes: u64) {
        self.bytes_uploaded_total.increment(bytes);
    }
}
