//! Chunked, metered streaming of the session blob.

use core::time::Duration;
use std::future::Future;
use std::io;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable};
use futures::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};
use vertex_blob_api::{
    BlobFile, BlobHandlerConfig, BlobManager, BlobSender, NegotiationStrategy, PaymentLedger,
};
use vertex_blob_primitives::{PaymentRate, Peer, PeerStat};

use crate::{
    BlobHandlerMetrics, BlobRequestHandler, TransferError,
    billing::bill_transfer,
    session::{SessionSlot, TransferSession},
};

/// Copy `reader` into `writer` in chunks of at most `chunk_size` bytes.
///
/// Each chunk is fully written before the next read. Every write the sink
/// accepts is reported to `on_chunk` with the bytes it took, so a transfer
/// that breaks mid-chunk still accounts for what was delivered. With a
/// `stall_timeout`, any single read, write or flush that makes no progress
/// for that long fails with [`TransferError::Stalled`].
pub(crate) async fn transfer<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
    stall_timeout: Option<Duration>,
    mut on_chunk: F,
) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    F: FnMut(u64),
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = within(stall_timeout, reader.read(&mut buf)).await??;
        if n == 0 {
            break;
        }
        let mut chunk = buf.get(..n).unwrap_or_default();
        while !chunk.is_empty() {
            let written = within(stall_timeout, writer.write(chunk)).await??;
            if written == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero).into());
            }
            total += written as u64;
            on_chunk(written as u64);
            chunk = chunk.get(written..).unwrap_or_default();
        }
    }

    within(stall_timeout, writer.flush()).await??;
    Ok(total)
}

async fn within<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, TransferError> {
    match limit {
        Some(after) => tokio::time::timeout(after, fut)
            .await
            .map_err(|_| TransferError::Stalled { after }),
        None => Ok(fut.await),
    }
}

/// Upload in flight. Owns the session and finalizes it when dropped.
///
/// Finalize bills the bytes sent, counts the blob as uploaded, releases the
/// read handle and frees the slot. It runs exactly once, whether the upload
/// completed, failed, was cancelled or was dropped by the transport.
pub(crate) struct ActiveUpload<'a, B: BlobFile, L: PaymentLedger> {
    session: Option<TransferSession<B>>,
    completed: bool,
    slot: &'a Mutex<SessionSlot<B>>,
    rate: &'a RwLock<Option<PaymentRate>>,
    ledger: &'a L,
    peer: &'a Peer,
    metrics: &'a BlobHandlerMetrics,
}

impl<B: BlobFile, L: PaymentLedger> ActiveUpload<'_, B, L> {
    async fn stream<W>(
        &mut self,
        consumer: &mut W,
        chunk_size: usize,
        stall_timeout: Option<Duration>,
    ) -> Result<u64, TransferError>
    where
        W: AsyncWrite + Unpin,
    {
        let peer = self.peer;
        let metrics = self.metrics;
        let Some((reader, counter)) = self.session.as_mut().and_then(TransferSession::stream_parts)
        else {
            return Ok(0);
        };

        transfer(reader, consumer, chunk_size, stall_timeout, |n| {
            counter.fetch_add(n, Ordering::AcqRel);
            peer.update_stats(PeerStat::BlobBytesUploaded, n);
            metrics.add_bytes_uploaded(n);
        })
        .await
    }

    fn finalize(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        self.metrics.inc_uploads_finished(self.completed);
        let bytes = session.take_bytes_uploaded();
        let rate = *self.rate.read();
        bill_transfer(self.ledger, self.peer, rate, bytes);
        self.peer.update_stats(PeerStat::BlobsUploaded, 1);

        debug!(peer = %self.peer, blob = %session.blob_hash(), bytes, "upload finalized");
        // Handle first, then the slot: a new session never overlaps this one.
        drop(session);
        *self.slot.lock() = SessionSlot::Idle;
    }
}

impl<B: BlobFile, L: PaymentLedger> Drop for ActiveUpload<'_, B, L> {
    fn drop(&mut self) {
        self.finalize();
    }
}

#[async_trait]
impl<M, S, L, C> BlobSender for BlobRequestHandler<M, S, L, C>
where
    M: BlobManager,
    S: NegotiationStrategy,
    L: PaymentLedger,
    C: BlobHandlerConfig,
{
    async fn send_blob_if_requested<W>(&self, consumer: &mut W) -> bool
    where
        W: AsyncWrite + Unpin + Send,
    {
        let (session, registration) = {
            let mut slot = self.session.lock();
            match std::mem::take(&mut *slot) {
                SessionSlot::Idle => return true,
                streaming @ SessionSlot::Streaming { .. } => {
                    *slot = streaming;
                    return true;
                }
                SessionSlot::Ready(session) => {
                    let (abort, registration) = AbortHandle::new_pair();
                    *slot = SessionSlot::Streaming {
                        abort,
                        progress: session.progress(),
                    };
                    (session, registration)
                }
            }
        };

        let blob = session.blob_hash().clone();
        info!(peer = %self.peer, %blob, "uploading blob");
        self.metrics.inc_uploads_started();

        let mut upload = ActiveUpload {
            session: Some(session),
            completed: false,
            slot: &self.session,
            rate: &self.rate,
            ledger: &*self.ledger,
            peer: &self.peer,
            metrics: &self.metrics,
        };

        let streamed = Abortable::new(
            upload.stream(consumer, self.config.chunk_size(), self.config.stall_timeout()),
            registration,
        )
        .await
        .unwrap_or(Err(TransferError::Cancelled));

        let completed = match streamed {
            Ok(bytes) => {
                info!(peer = %self.peer, %blob, bytes, "blob uploaded");
                true
            }
            Err(TransferError::Cancelled) => {
                info!(peer = %self.peer, %blob, "upload cancelled");
                false
            }
            Err(e) => {
                warn!(peer = %self.peer, %blob, error = %e, "upload failed");
                false
            }
        };
        upload.completed = completed;
        upload.finalize();
        completed
    }

    fn cancel_send<E>(&self, reason: E) -> E {
        let mut slot = self.session.lock();
        match &*slot {
            SessionSlot::Idle => {}
            SessionSlot::Ready(session) => {
                debug!(peer = %self.peer, blob = %session.blob_hash(), "cancelling pending upload");
                // Session drop closes the handle.
                *slot = SessionSlot::Idle;
            }
            SessionSlot::Streaming { abort, .. } => {
                debug!(peer = %self.peer, "cancelling upload in flight");
                abort.abort();
            }
        }
        reason
    }
}
