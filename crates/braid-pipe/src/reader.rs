//! Reader handle for a single lane

use std::future::poll_fn;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::lane::Lane;

/// The consuming side of one lane.
///
/// Bytes arrive in producer order. Once the lane is terminated and its
/// buffer drained, every read yields end of stream (clean close) or the
/// stored close reason.
pub struct LaneReader<E> {
    lane: Arc<Lane<E>>,
    index: usize,
}

impl<E> std::fmt::Debug for LaneReader<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaneReader").field("index", &self.index).finish()
    }
}

impl<E> LaneReader<E> {
    pub(crate) fn new(lane: Arc<Lane<E>>, index: usize) -> Self {
        Self { lane, index }
    }

    /// Index of the lane this reader drains.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<E: Clone> LaneReader<E> {
    /// Read buffered bytes into `dst`, suspending while the lane is empty
    /// and open. Returns `Ok(0)` at end of stream; after a close with a
    /// reason, returns that reason on this and every subsequent call.
    pub async fn read(&mut self, dst: &mut [u8]) -> Result<usize, E> {
        poll_fn(|cx| self.lane.poll_read(cx, dst)).await
    }
}

impl<E> AsyncRead for LaneReader<E>
where
    E: Clone + std::error::Error + Send + Sync + 'static,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let dst = buf.initialize_unfilled();
        match this.lane.poll_read(cx, dst) {
            Poll::Ready(Ok(n)) => {
                buf.advance(n);
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(reason)) => Poll::Ready(Err(io::Error::other(reason))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<E> Drop for LaneReader<E> {
    fn drop(&mut self) {
        // Nobody is left to drain the lane; fail the writer fast rather
        // than letting it suspend on a full buffer forever.
        self.lane.close(None);
    }
}
