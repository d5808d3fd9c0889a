//! Sinks for exercising transfer failures.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::AsyncWrite;

/// Accepts up to `limit` bytes, then fails every write.
#[derive(Debug)]
pub struct FailingWriter {
    limit: usize,
    written: Vec<u8>,
}

impl FailingWriter {
    /// Writer that breaks once `limit` bytes were accepted.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            written: Vec::new(),
        }
    }

    /// Bytes accepted before the failure.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl AsyncWrite for FailingWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let room = this.limit.saturating_sub(this.written.len());
        if room == 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "consumer went away",
            )));
        }
        let n = room.min(buf.len());
        this.written.extend_from_slice(buf.get(..n).unwrap_or_default());
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
