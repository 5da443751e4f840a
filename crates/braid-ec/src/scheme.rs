//! The erasure scheme contract

use std::collections::HashMap;

use bytes::Bytes;

use crate::SchemeError;

/// Stripe-to-shares arithmetic supplied by the caller.
///
/// Implementers must guarantee that `encode` is pure with respect to its
/// input stripe, that share `i` is exactly [`share_size`] bytes, and that
/// `decode` reconstructs the original stripe bit-identically from any
/// subset of at least [`required_count`] shares.
///
/// [`share_size`]: ErasureScheme::share_size
/// [`required_count`]: ErasureScheme::required_count
pub trait ErasureScheme: Send + Sync {
    /// Encode one stripe, calling `emit(i, share_i)` once per share.
    fn encode(
        &self,
        stripe: &[u8],
        emit: &mut dyn FnMut(usize, &[u8]),
    ) -> std::result::Result<(), SchemeError>;

    /// Reconstruct a stripe from at least [`required_count`] shares, keyed
    /// by share number.
    ///
    /// [`required_count`]: ErasureScheme::required_count
    fn decode(&self, shares: &HashMap<usize, Bytes>) -> std::result::Result<Bytes, SchemeError>;

    /// Bytes consumed per input stripe. Always positive.
    fn stripe_size(&self) -> usize;

    /// Bytes per output share. Always positive.
    fn share_size(&self) -> usize;

    /// Minimum number of shares needed to reconstruct a stripe.
    fn required_count(&self) -> usize;

    /// Number of shares produced per stripe.
    fn total_count(&self) -> usize;
}
