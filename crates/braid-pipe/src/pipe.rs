//! The lane set and handle split

use std::sync::Arc;

use crate::lane::Lane;
use crate::{LaneReader, LaneWriter};

/// A fixed set of independent bounded byte pipes.
///
/// Every lane gets the same byte capacity. The pipe itself is only a
/// factory: [`split`] hands out one writer and one reader per lane, and the
/// lane buffers live for as long as either handle does.
///
/// [`split`]: MultiPipe::split
pub struct MultiPipe<E> {
    lanes: Vec<Arc<Lane<E>>>,
}

impl<E> MultiPipe<E> {
    /// Create `lanes` lanes of `capacity` bytes each.
    pub fn new(lanes: usize, capacity: usize) -> Self {
        Self {
            lanes: (0..lanes).map(|_| Arc::new(Lane::new(capacity))).collect(),
        }
    }

    /// Number of lanes.
    pub fn lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Split into per-lane writer and reader handles, in lane order.
    pub fn split(self) -> (Vec<LaneWriter<E>>, Vec<LaneReader<E>>) {
        let writers = self
            .lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| LaneWriter::new(Arc::clone(lane), i))
            .collect();
        let readers = self
            .lanes
            .into_iter()
            .enumerate()
            .map(|(i, lane)| LaneReader::new(lane, i))
            .collect();
        (writers, readers)
    }
}
