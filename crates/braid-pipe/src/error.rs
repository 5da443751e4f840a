//! Error type for lane operations

use thiserror::Error;

/// Returned when writing to a lane that has been terminated.
///
/// Carries the close reason stored by the terminating [`close`] call, or
/// `None` when the lane was closed cleanly (including by dropping its
/// reader).
///
/// [`close`]: crate::LaneWriter::close
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lane closed")]
pub struct Closed<E>(pub Option<E>);

impl<E> Closed<E> {
    /// The reason the lane was terminated, if one was stored.
    pub fn into_reason(self) -> Option<E> {
        self.0
    }
}
