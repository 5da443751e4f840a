//! Multi-lane in-memory byte pipes with backpressure and error propagation
//!
//! This crate provides the fan-out primitive used by the braid encoder: a
//! fixed set of independent single-producer single-consumer byte pipes
//! ("lanes") that share a lifecycle but nothing else. One producer task
//! writes to every lane; each lane is drained by its own consumer.
//!
//! # Architecture
//!
//! ```text
//!                    ┌── lane 0 ──▶ LaneReader 0
//!  producer ────────▶├── lane 1 ──▶ LaneReader 1
//!  (LaneWriters)     ├── lane 2 ──▶ LaneReader 2
//!                    └── lane 3 ──▶ LaneReader 3
//! ```
//!
//! Each lane is a bounded byte buffer guarded by a mutex plus one parked
//! waker per side. Writers suspend while a lane is at capacity; readers
//! suspend while a lane is empty and open. A slow consumer on one lane never
//! wakes or blocks any other lane.
//!
//! # Termination
//!
//! A lane is terminated with [`LaneWriter::close`], carrying an optional
//! reason of the caller-chosen type `E`. Bytes already buffered remain
//! readable; once drained, the reader observes either end of stream (no
//! reason) or the stored reason on every subsequent read. The first close
//! wins and later closes are no-ops. Dropping a writer closes its lane
//! cleanly; dropping a reader terminates the lane so a stranded writer fails
//! fast instead of suspending forever.

mod error;
mod lane;
mod pipe;
mod reader;
mod writer;

pub use error::Closed;
pub use pipe::MultiPipe;
pub use reader::LaneReader;
pub use writer::LaneWriter;
