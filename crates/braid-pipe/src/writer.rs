//! Writer handle for a single lane

use std::future::poll_fn;
use std::sync::Arc;

use crate::lane::Lane;
use crate::Closed;

/// The producing side of one lane.
///
/// There is exactly one writer per lane. Writes are appended in call order
/// and never interleaved or reordered.
pub struct LaneWriter<E> {
    lane: Arc<Lane<E>>,
    index: usize,
}

impl<E> LaneWriter<E> {
    pub(crate) fn new(lane: Arc<Lane<E>>, index: usize) -> Self {
        Self { lane, index }
    }

    /// Index of the lane this writer feeds.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Terminate the lane, storing `reason` for the reader to observe after
    /// it drains the buffered bytes. Idempotent; the first close wins.
    /// Returns whether this call terminated the lane.
    pub fn close(&self, reason: Option<E>) -> bool {
        self.lane.close(reason)
    }
}

impl<E: Clone> LaneWriter<E> {
    /// Append all of `data` to the lane, suspending whenever the lane buffer
    /// is at capacity. Fails with [`Closed`] once the lane is terminated.
    pub async fn write_all(&mut self, mut data: &[u8]) -> Result<(), Closed<E>> {
        while !data.is_empty() {
            let n = poll_fn(|cx| self.lane.poll_write(cx, data)).await?;
            data = &data[n..];
        }
        Ok(())
    }
}

impl<E> Drop for LaneWriter<E> {
    fn drop(&mut self) {
        // A vanished writer reads as end of stream, not as an error.
        self.lane.close(None);
    }
}
