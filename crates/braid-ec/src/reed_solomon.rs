//! Reed-Solomon erasure scheme

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use reed_solomon_simd::{ReedSolomonDecoder, ReedSolomonEncoder};

use crate::{ErasureScheme, Error, Result, SchemeError};

/// An [`ErasureScheme`] over Reed-Solomon arithmetic.
///
/// A stripe of `required * share_size` bytes is split into `required` data
/// shares; `total - required` recovery shares are computed from them. Any
/// `required` of the `total` shares reconstruct the stripe.
pub struct ReedSolomonScheme {
    required: usize,
    total: usize,
    share_size: usize,
}

impl ReedSolomonScheme {
    /// Create a scheme producing `total` shares per stripe, any `required`
    /// of which suffice to reconstruct it.
    ///
    /// `share_size` must be positive and even (a requirement of the
    /// underlying arithmetic).
    pub fn new(required: usize, total: usize, share_size: usize) -> Result<Self> {
        if required == 0 {
            return Err(Error::InvalidArgument(
                "required count must be at least 1".into(),
            ));
        }
        if total < required {
            return Err(Error::InvalidArgument(format!(
                "total count {total} below required count {required}"
            )));
        }
        if share_size == 0 || share_size % 2 != 0 {
            return Err(Error::InvalidArgument(format!(
                "share size {share_size} must be positive and even"
            )));
        }
        Ok(Self {
            required,
            total,
            share_size,
        })
    }

    /// 4 data shares plus 2 recovery shares: 50% overhead, tolerates 2
    /// losses.
    pub fn rs_4_2(share_size: usize) -> Result<Self> {
        Self::new(4, 6, share_size)
    }

    /// 6 data shares plus 3 recovery shares.
    pub fn rs_6_3(share_size: usize) -> Result<Self> {
        Self::new(6, 9, share_size)
    }

    /// 10 data shares plus 4 recovery shares: 40% overhead, tolerates 4
    /// losses.
    pub fn rs_10_4(share_size: usize) -> Result<Self> {
        Self::new(10, 14, share_size)
    }

    fn parity(&self) -> usize {
        self.total - self.required
    }
}

impl ErasureScheme for ReedSolomonScheme {
    fn encode(
        &self,
        stripe: &[u8],
        emit: &mut dyn FnMut(usize, &[u8]),
    ) -> std::result::Result<(), SchemeError> {
        if stripe.len() != self.stripe_size() {
            return Err(SchemeError::new(format!(
                "stripe of {} bytes, expected {}",
                stripe.len(),
                self.stripe_size()
            )));
        }

        let mut encoder = ReedSolomonEncoder::new(self.required, self.parity(), self.share_size)
            .map_err(|e| SchemeError::new(format!("encoder setup: {e}")))?;
        for chunk in stripe.chunks(self.share_size) {
            encoder
                .add_original_shard(chunk)
                .map_err(|e| SchemeError::new(format!("add data share: {e}")))?;
        }
        let encoded = encoder
            .encode()
            .map_err(|e| SchemeError::new(format!("encode: {e}")))?;

        for (num, chunk) in stripe.chunks(self.share_size).enumerate() {
            emit(num, chunk);
        }
        for (num, recovery) in encoded.recovery_iter().enumerate() {
            emit(self.required + num, recovery);
        }
        Ok(())
    }

    fn decode(&self, shares: &HashMap<usize, Bytes>) -> std::result::Result<Bytes, SchemeError> {
        if shares.len() < self.required {
            return Err(SchemeError::new(format!(
                "insufficient shares: need {}, have {}",
                self.required,
                shares.len()
            )));
        }
        for (num, share) in shares {
            if *num >= self.total {
                return Err(SchemeError::new(format!(
                    "share number {num} out of range for {} shares",
                    self.total
                )));
            }
            if share.len() != self.share_size {
                return Err(SchemeError::new(format!(
                    "share {num} of {} bytes, expected {}",
                    share.len(),
                    self.share_size
                )));
            }
        }

        // With every data share present the stripe is just their
        // concatenation.
        if (0..self.required).all(|num| shares.contains_key(&num)) {
            let mut stripe = BytesMut::with_capacity(self.stripe_size());
            for num in 0..self.required {
                stripe.extend_from_slice(&shares[&num]);
            }
            return Ok(stripe.freeze());
        }

        let mut decoder = ReedSolomonDecoder::new(self.required, self.parity(), self.share_size)
            .map_err(|e| SchemeError::new(format!("decoder setup: {e}")))?;
        for (num, share) in shares {
            if *num < self.required {
                decoder
                    .add_original_shard(*num, share)
                    .map_err(|e| SchemeError::new(format!("add data share: {e}")))?;
            } else {
                decoder
                    .add_recovery_shard(*num - self.required, share)
                    .map_err(|e| SchemeError::new(format!("add recovery share: {e}")))?;
            }
        }
        let restored = decoder
            .decode()
            .map_err(|e| SchemeError::new(format!("decode: {e}")))?;

        let mut stripe = vec![0u8; self.stripe_size()];
        for (num, share) in shares {
            if *num < self.required {
                let start = num * self.share_size;
                stripe[start..start + self.share_size].copy_from_slice(share);
            }
        }
        for (num, share) in restored.restored_original_iter() {
            let start = num * self.share_size;
            stripe[start..start + self.share_size].copy_from_slice(share);
        }
        Ok(stripe.into())
    }

    fn stripe_size(&self) -> usize {
        self.required * self.share_size
    }

    fn share_size(&self) -> usize {
        self.share_size
    }

    fn required_count(&self) -> usize {
        self.required
    }

    fn total_count(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_shares(scheme: &ReedSolomonScheme, stripe: &[u8]) -> Vec<Bytes> {
        let mut shares = vec![Bytes::new(); scheme.total_count()];
        scheme
            .encode(stripe, &mut |num, share| {
                shares[num] = Bytes::copy_from_slice(share);
            })
            .unwrap();
        shares
    }

    fn decode_with(
        scheme: &ReedSolomonScheme,
        shares: &[Bytes],
        keep: &[usize],
    ) -> std::result::Result<Bytes, SchemeError> {
        let subset: HashMap<usize, Bytes> = keep
            .iter()
            .map(|&num| (num, shares[num].clone()))
            .collect();
        scheme.decode(&subset)
    }

    #[test]
    fn share_shape_matches_counts() {
        let scheme = ReedSolomonScheme::rs_4_2(64).unwrap();
        let stripe: Vec<u8> = (0..scheme.stripe_size()).map(|i| i as u8).collect();

        let shares = encode_shares(&scheme, &stripe);
        assert_eq!(shares.len(), 6);
        for share in &shares {
            assert_eq!(share.len(), 64);
        }
        // Data shares are the stripe itself.
        assert_eq!(&shares[0][..], &stripe[..64]);
        assert_eq!(&shares[3][..], &stripe[192..]);
    }

    #[test]
    fn decode_with_all_data_shares() {
        let scheme = ReedSolomonScheme::rs_4_2(32).unwrap();
        let stripe: Vec<u8> = (0..scheme.stripe_size()).map(|i| (i * 7) as u8).collect();

        let shares = encode_shares(&scheme, &stripe);
        let decoded = decode_with(&scheme, &shares, &[0, 1, 2, 3]).unwrap();
        assert_eq!(&decoded[..], &stripe[..]);
    }

    #[test]
    fn decode_recovers_lost_data_shares() {
        let scheme = ReedSolomonScheme::rs_4_2(32).unwrap();
        let stripe: Vec<u8> = (0..scheme.stripe_size()).map(|i| (i * 3) as u8).collect();

        let shares = encode_shares(&scheme, &stripe);
        // Lose data shares 1 and 2, keep both recovery shares.
        let decoded = decode_with(&scheme, &shares, &[0, 3, 4, 5]).unwrap();
        assert_eq!(&decoded[..], &stripe[..]);
    }

    #[test]
    fn decode_fails_below_required() {
        let scheme = ReedSolomonScheme::rs_4_2(32).unwrap();
        let stripe: Vec<u8> = (0..scheme.stripe_size()).map(|i| i as u8).collect();

        let shares = encode_shares(&scheme, &stripe);
        assert!(decode_with(&scheme, &shares, &[0, 4, 5]).is_err());
    }

    #[test]
    fn decode_rejects_wrong_share_size() {
        let scheme = ReedSolomonScheme::rs_4_2(32).unwrap();
        let shares: HashMap<usize, Bytes> = (0..4)
            .map(|num| (num, Bytes::from(vec![0u8; 16])))
            .collect();
        assert!(scheme.decode(&shares).is_err());
    }

    #[test]
    fn constructor_rejects_bad_parameters() {
        assert!(ReedSolomonScheme::new(0, 4, 32).is_err());
        assert!(ReedSolomonScheme::new(4, 2, 32).is_err());
        assert!(ReedSolomonScheme::new(2, 4, 0).is_err());
        assert!(ReedSolomonScheme::new(2, 4, 31).is_err());
    }

    #[test]
    fn encode_rejects_wrong_stripe_size() {
        let scheme = ReedSolomonScheme::rs_4_2(32).unwrap();
        let err = scheme.encode(&[0u8; 4], &mut |_, _| {});
        assert!(err.is_err());
    }
}
