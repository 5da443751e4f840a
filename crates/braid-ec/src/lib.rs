//! Erasure-coded streaming encoder
//!
//! This crate is the streaming heart of the braid object-storage client: it
//! takes one input byte stream and a redundancy policy and fans it out into
//! `total` parallel share streams, any `required` of which reconstruct the
//! original bit-identically.
//!
//! # Architecture
//!
//! ```text
//!                 stripe            shares
//!  source ──read──▶ [scratch] ──encode──▶ ┌─▶ lane 0 ─▶ reader 0
//!                                         ├─▶ lane 1 ─▶ reader 1
//!                                         ├─▶ ...
//!                                         └─▶ lane N ─▶ reader N
//! ```
//!
//! A single producer task reads stripe-sized chunks, encodes each stripe
//! through an [`ErasureScheme`], and writes share `i` to lane `i` of a
//! [`braid_pipe::MultiPipe`]. Consumers drain the lanes independently; a
//! slow consumer only backpressures its own lane.
//!
//! # Entry points
//!
//! - [`encode`] wraps a sequential reader and returns the lane readers.
//! - [`RangedEncoder`] wraps a [`braid_ranger::RangeSource`] and encodes
//!   only the stripes covering a requested output byte range.
//! - [`ReedSolomonScheme`] is a ready-made [`ErasureScheme`] over
//!   Reed-Solomon arithmetic.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Cursor;
//! use std::sync::Arc;
//! use braid_ec::{encode, RedundancyStrategy, ReedSolomonScheme};
//! use tokio::sync::watch;
//!
//! # async fn example() -> braid_ec::Result<()> {
//! let scheme = Arc::new(ReedSolomonScheme::rs_4_2(1024)?);
//! let strategy = RedundancyStrategy::new(scheme, 0, 0)?;
//! let (_cancel_tx, cancel) = watch::channel(false);
//!
//! let data = vec![0u8; 8192];
//! let readers = encode(cancel, Cursor::new(data), strategy, 8192)?;
//! assert_eq!(readers.len(), 6);
//! # Ok(())
//! # }
//! ```

mod encode;
mod error;
mod ranged;
mod reed_solomon;
mod scheme;
mod strategy;

pub use encode::encode;
pub use error::{Error, Result, SchemeError};
pub use ranged::RangedEncoder;
pub use reed_solomon::ReedSolomonScheme;
pub use scheme::ErasureScheme;
pub use strategy::RedundancyStrategy;

pub use braid_pipe::LaneReader;
