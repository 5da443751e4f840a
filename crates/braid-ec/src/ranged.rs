//! Ranged encoding over a random-access source

use std::sync::Arc;

use braid_pipe::LaneReader;
use braid_ranger::{encompassing_blocks, RangeSource};
use tokio::io::{AsyncReadExt, Take};
use tokio::sync::watch;
use tracing::debug;

use crate::{encode, Error, RedundancyStrategy, Result};

/// Encodes byte slices of the share streams on demand.
///
/// Offsets and lengths passed to [`range`] are in output coordinates:
/// positions in the stream of shares as if the entire input had been
/// encoded. The encoder maps the requested slice to the covering run of
/// whole share-sized blocks, encodes only the input stripes behind those
/// blocks, and trims each lane to the exact request.
///
/// [`range`]: RangedEncoder::range
pub struct RangedEncoder {
    source: Arc<dyn RangeSource>,
    strategy: RedundancyStrategy,
    max_size: i64,
}

impl std::fmt::Debug for RangedEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangedEncoder")
            .field("strategy", &self.strategy)
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl RangedEncoder {
    /// Wrap a range source for ranged encoding.
    ///
    /// The source size must be a whole multiple of the stripe size and
    /// `max_size` must be non-negative; anything else is
    /// [`Error::InvalidArgument`].
    pub fn new(
        source: Arc<dyn RangeSource>,
        strategy: RedundancyStrategy,
        max_size: i64,
    ) -> Result<Self> {
        if max_size < 0 {
            return Err(Error::InvalidArgument(format!(
                "negative max size: {max_size}"
            )));
        }
        let stripe_size = strategy.stripe_size() as i64;
        if source.size() % stripe_size != 0 {
            return Err(Error::InvalidArgument(format!(
                "source size {} not a multiple of stripe size {stripe_size}",
                source.size()
            )));
        }
        Ok(Self {
            source,
            strategy,
            max_size,
        })
    }

    /// Size of each fully encoded share stream, in bytes.
    pub fn output_size(&self) -> i64 {
        let stripes = self.source.size() / self.strategy.stripe_size() as i64;
        stripes * self.strategy.share_size() as i64
    }

    /// Encode the stripes covering `[offset, offset + length)` of the
    /// output, returning per-lane readers that each yield exactly `length`
    /// bytes of their share stream.
    pub async fn range(
        &self,
        cancel: watch::Receiver<bool>,
        offset: i64,
        length: i64,
    ) -> Result<Vec<Take<LaneReader<Error>>>> {
        let output_size = self.output_size();
        if offset < 0 || length < 0 || offset + length > output_size {
            return Err(Error::InvalidArgument(format!(
                "range [{offset}, {offset}+{length}) out of bounds for {output_size} encoded bytes"
            )));
        }

        let stripe_size = self.strategy.stripe_size() as i64;
        let share_size = self.strategy.share_size() as i64;

        // The request is rarely block-aligned; find the whole share-sized
        // blocks containing it, then encode the stripes behind them.
        let (first_block, block_count) =
            encompassing_blocks(offset, length, self.strategy.share_size());
        debug!(offset, length, first_block, block_count, "ranged encode");

        let sub_source = self
            .source
            .range(first_block * stripe_size, block_count * stripe_size)
            .await?;
        let readers = encode(cancel, sub_source, self.strategy.clone(), self.max_size)?;

        // Each lane starts at a block boundary; drop the lead-in up to
        // `offset`, then cap at the requested length.
        let skip = (offset - first_block * share_size) as u64;
        let mut trimmed = Vec::with_capacity(readers.len());
        for mut reader in readers {
            discard_prefix(&mut reader, skip).await?;
            trimmed.push(reader.take(length as u64));
        }
        Ok(trimmed)
    }
}

/// Read and drop `remaining` bytes. Stops early at end of stream, which is
/// only reachable when the covering block set is empty (a zero-length
/// request).
async fn discard_prefix(reader: &mut LaneReader<Error>, mut remaining: u64) -> Result<()> {
    let mut scratch = [0u8; 512];
    while remaining > 0 {
        let want = scratch.len().min(remaining as usize);
        let n = reader.read(&mut scratch[..want]).await?;
        if n == 0 {
            break;
        }
        remaining -= n as u64;
    }
    Ok(())
}
