//! Error types for the erasure streaming encoder

use std::sync::Arc;

use braid_pipe::Closed;
use braid_ranger::RangerError;
use thiserror::Error;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the encoder, either synchronously from constructors
/// or through the lane readers once the producer task terminates.
///
/// The type is `Clone` (I/O causes are held behind an [`Arc`]) because one
/// terminal error is stored in every lane for its consumer to observe.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A caller-supplied argument is out of range or misaligned.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Redundancy-strategy validation failed.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    /// The input ended in the middle of a stripe.
    #[error("short read: stripe needs {want} bytes, got {got}")]
    ShortRead {
        /// Bytes a whole stripe requires.
        want: usize,
        /// Bytes actually read before the stream ended.
        got: usize,
    },

    /// A share was written to a lane that was already terminated.
    #[error("write to closed lane")]
    PipeClosed,

    /// The cancellation signal was observed.
    #[error("encode cancelled")]
    Cancelled,

    /// The erasure scheme reported an error.
    #[error("erasure scheme: {0}")]
    Scheme(#[from] SchemeError),

    /// The input source failed with something other than end of stream.
    #[error("source i/o: {0}")]
    Source(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Source(Arc::new(err))
    }
}

impl From<RangerError> for Error {
    fn from(err: RangerError) -> Self {
        match err {
            RangerError::OutOfRange { .. } => Error::InvalidArgument(err.to_string()),
            RangerError::Io(cause) => Error::Source(cause),
        }
    }
}

impl From<Closed<Error>> for Error {
    fn from(closed: Closed<Error>) -> Self {
        // A lane closed by the producer hands back its own terminal error;
        // a lane terminated from the consumer side has no stored reason.
        closed.into_reason().unwrap_or(Error::PipeClosed)
    }
}

/// Error reported by an [`ErasureScheme`] implementation.
///
/// [`ErasureScheme`]: crate::ErasureScheme
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SchemeError(String);

impl SchemeError {
    /// Create a scheme error from a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
