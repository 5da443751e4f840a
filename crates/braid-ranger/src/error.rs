//! Error types for range sources

use std::sync::Arc;

use thiserror::Error;

/// Errors produced by [`RangeSource`] implementations.
///
/// I/O failures are held behind an [`Arc`] so the error stays cheap to
/// clone when fanned out to multiple consumers.
///
/// [`RangeSource`]: crate::RangeSource
#[derive(Debug, Clone, Error)]
pub enum RangerError {
    /// The requested range does not fit the source.
    #[error("range [{offset}, {offset}+{length}) out of bounds for source of {size} bytes")]
    OutOfRange {
        /// Requested start offset.
        offset: i64,
        /// Requested length.
        length: i64,
        /// Total source size.
        size: i64,
    },

    /// The underlying container failed.
    #[error("range source i/o: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for RangerError {
    fn from(err: std::io::Error) -> Self {
        RangerError::Io(Arc::new(err))
    }
}
