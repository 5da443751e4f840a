//! Random-access byte sources for the braid encoder
//!
//! A [`RangeSource`] is a byte container that can open a sequential reader
//! over any sub-range of itself. The crate ships two implementations,
//! [`MemorySource`] for bytes already in memory and [`FileSource`] for
//! seek-based file access, plus the block-covering arithmetic used to align
//! arbitrary byte ranges to fixed-size blocks.

mod blocks;
mod error;
mod source;

pub use blocks::encompassing_blocks;
pub use error::RangerError;
pub use source::{FileSource, MemorySource, RangeSource};

/// Result type for range-source operations.
pub type Result<T> = std::result::Result<T, RangerError>;
