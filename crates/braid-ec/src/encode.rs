//! Streaming fan-out encoder

use braid_pipe::{LaneReader, LaneWriter, MultiPipe};
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::{Error, RedundancyStrategy, Result, SchemeError};

/// Encode `source` through `strategy`, returning one reader per share lane.
///
/// The readers are returned synchronously, in lane order; a producer task
/// is already running when this returns, so consumers may begin reading
/// immediately. `max_size` is the maximum number of bytes the source is
/// expected to yield; each lane is buffered at `max_size / required` bytes,
/// enough for a well-formed input to fan out fully even if some lanes are
/// never drained. A negative `max_size` fails with
/// [`Error::InvalidArgument`].
///
/// The input must be a whole multiple of the stripe size; a stream ending
/// mid-stripe terminates every lane with [`Error::ShortRead`]. Tripping
/// `cancel` terminates every lane with [`Error::Cancelled`] before the next
/// stripe is read.
///
/// Must be called from within a tokio runtime.
pub fn encode<R>(
    cancel: watch::Receiver<bool>,
    source: R,
    strategy: RedundancyStrategy,
    max_size: i64,
) -> Result<Vec<LaneReader<Error>>>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    if max_size < 0 {
        return Err(Error::InvalidArgument(format!(
            "negative max size: {max_size}"
        )));
    }
    // A lane carries at most max_size / required bytes for an input within
    // max_size, so at this capacity no lane write waits on another lane.
    let lane_capacity = (max_size / strategy.required_count() as i64) as usize;

    let pipe = MultiPipe::new(strategy.total_count(), lane_capacity);
    let (writers, readers) = pipe.split();
    tokio::spawn(run_producer(cancel, source, strategy, writers));
    Ok(readers)
}

/// Drive the fan-out to completion, then close every lane: cleanly on end
/// of stream, with the terminal error otherwise.
async fn run_producer<R: AsyncRead + Unpin>(
    cancel: watch::Receiver<bool>,
    source: R,
    strategy: RedundancyStrategy,
    mut writers: Vec<LaneWriter<Error>>,
) {
    debug!(
        lanes = strategy.total_count(),
        stripe_size = strategy.stripe_size(),
        "encode stream started"
    );
    let reason = match fill_lanes(cancel, source, &strategy, &mut writers).await {
        Ok(stripes) => {
            debug!(stripes, "encode stream drained");
            None
        }
        Err(err) => {
            // A lane write failing means a consumer went away mid-stream;
            // that strands the producer and deserves more than a debug line.
            if matches!(err, Error::PipeClosed) {
                warn!(%err, "encode stream stranded by lane write failure");
            } else {
                debug!(%err, "encode stream terminated");
            }
            Some(err)
        }
    };
    for writer in &writers {
        if !writer.close(reason.clone()) {
            warn!(lane = writer.index(), "lane already terminated at close");
        }
    }
}

async fn fill_lanes<R: AsyncRead + Unpin>(
    cancel: watch::Receiver<bool>,
    mut source: R,
    strategy: &RedundancyStrategy,
    writers: &mut [LaneWriter<Error>],
) -> Result<u64> {
    let total = strategy.total_count();
    let mut stripe = vec![0u8; strategy.stripe_size()];
    let mut shares: Vec<BytesMut> = (0..total)
        .map(|_| BytesMut::with_capacity(strategy.share_size()))
        .collect();
    let mut stripes = 0u64;

    loop {
        if *cancel.borrow() {
            return Err(Error::Cancelled);
        }

        match read_stripe(&mut source, &mut stripe).await? {
            StripeRead::End => return Ok(stripes),
            StripeRead::Full => {}
        }

        // The emit callback cannot suspend, so shares are staged here and
        // fanned out to the lanes afterwards. An encode error takes
        // precedence over anything the callback observed.
        for share in shares.iter_mut() {
            share.clear();
        }
        let mut emit_err = None;
        strategy.scheme().encode(&stripe, &mut |num, share| {
            match shares.get_mut(num) {
                Some(buf) => buf.extend_from_slice(share),
                None => {
                    emit_err
                        .get_or_insert_with(|| SchemeError::new(format!(
                            "share number {num} out of range for {total} lanes"
                        )));
                }
            }
        })?;
        if let Some(err) = emit_err {
            return Err(err.into());
        }

        for (writer, share) in writers.iter_mut().zip(&shares) {
            writer.write_all(share).await?;
        }

        stripes += 1;
        trace!(stripe = stripes, "stripe fanned out");
    }
}

#[derive(Debug)]
enum StripeRead {
    /// The scratch buffer holds one whole stripe.
    Full,
    /// The stream ended cleanly on a stripe boundary.
    End,
}

/// Read exactly one stripe. Zero bytes at a stripe boundary is end of
/// stream; zero bytes mid-stripe is [`Error::ShortRead`].
async fn read_stripe<R: AsyncRead + Unpin>(
    source: &mut R,
    stripe: &mut [u8],
) -> Result<StripeRead> {
    let mut filled = 0;
    while filled < stripe.len() {
        let n = source.read(&mut stripe[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(StripeRead::End);
            }
            return Err(Error::ShortRead {
                want: stripe.len(),
                got: filled,
            });
        }
        filled += n;
    }
    Ok(StripeRead::Full)
}
