//! Redundancy policy validation

use std::fmt;
use std::sync::Arc;

use crate::{ErasureScheme, Error, Result};

/// An [`ErasureScheme`] bundled with validated repair and optimal
/// thresholds.
///
/// The repair threshold is the number of available shares below which the
/// data must be repaired to avoid loss; the optimal threshold is the number
/// above which no repair is needed. Construction enforces
/// `required <= repair <= optimal <= total`.
#[derive(Clone)]
pub struct RedundancyStrategy {
    scheme: Arc<dyn ErasureScheme>,
    repair_threshold: usize,
    optimal_threshold: usize,
}

impl RedundancyStrategy {
    /// Validate `repair_threshold` and `optimal_threshold` against the
    /// scheme's counts.
    ///
    /// A zero threshold is normalized to the scheme's total count before
    /// any range check. Negative thresholds, positive thresholds below the
    /// required count, thresholds above the total count, and a repair
    /// threshold above the optimal threshold all fail with
    /// [`Error::InvalidThreshold`].
    pub fn new(
        scheme: Arc<dyn ErasureScheme>,
        repair_threshold: i32,
        optimal_threshold: i32,
    ) -> Result<Self> {
        let required = scheme.required_count();
        let total = scheme.total_count();

        let mut repair = repair_threshold;
        let mut optimal = optimal_threshold;
        if repair == 0 {
            repair = total as i32;
        }
        if optimal == 0 {
            optimal = total as i32;
        }

        if repair < 0 {
            return Err(Error::InvalidThreshold("negative repair threshold".into()));
        }
        if (repair as usize) < required {
            return Err(Error::InvalidThreshold(format!(
                "repair threshold {repair} below required count {required}"
            )));
        }
        if repair as usize > total {
            return Err(Error::InvalidThreshold(format!(
                "repair threshold {repair} above total count {total}"
            )));
        }
        if optimal < 0 {
            return Err(Error::InvalidThreshold("negative optimal threshold".into()));
        }
        if (optimal as usize) < required {
            return Err(Error::InvalidThreshold(format!(
                "optimal threshold {optimal} below required count {required}"
            )));
        }
        if optimal as usize > total {
            return Err(Error::InvalidThreshold(format!(
                "optimal threshold {optimal} above total count {total}"
            )));
        }
        if repair > optimal {
            return Err(Error::InvalidThreshold(format!(
                "repair threshold {repair} above optimal threshold {optimal}"
            )));
        }

        Ok(Self {
            scheme,
            repair_threshold: repair as usize,
            optimal_threshold: optimal as usize,
        })
    }

    /// The underlying scheme.
    pub fn scheme(&self) -> &Arc<dyn ErasureScheme> {
        &self.scheme
    }

    /// Number of available shares below which repair is mandated.
    pub fn repair_threshold(&self) -> usize {
        self.repair_threshold
    }

    /// Number of available shares above which repair is unnecessary.
    pub fn optimal_threshold(&self) -> usize {
        self.optimal_threshold
    }

    /// Bytes consumed per input stripe.
    pub fn stripe_size(&self) -> usize {
        self.scheme.stripe_size()
    }

    /// Bytes per output share.
    pub fn share_size(&self) -> usize {
        self.scheme.share_size()
    }

    /// Minimum shares needed to reconstruct a stripe.
    pub fn required_count(&self) -> usize {
        self.scheme.required_count()
    }

    /// Shares produced per stripe.
    pub fn total_count(&self) -> usize {
        self.scheme.total_count()
    }
}

impl fmt::Debug for RedundancyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedundancyStrategy")
            .field("required", &self.required_count())
            .field("total", &self.total_count())
            .field("repair_threshold", &self.repair_threshold)
            .field("optimal_threshold", &self.optimal_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;
    use crate::SchemeError;

    /// Counts-only scheme for validation tests.
    struct Counts {
        required: usize,
        total: usize,
    }

    impl ErasureScheme for Counts {
        fn encode(
            &self,
            _stripe: &[u8],
            _emit: &mut dyn FnMut(usize, &[u8]),
        ) -> std::result::Result<(), SchemeError> {
            Err(SchemeError::new("not an arithmetic scheme"))
        }

        fn decode(
            &self,
            _shares: &HashMap<usize, Bytes>,
        ) -> std::result::Result<Bytes, SchemeError> {
            Err(SchemeError::new("not an arithmetic scheme"))
        }

        fn stripe_size(&self) -> usize {
            self.required
        }

        fn share_size(&self) -> usize {
            1
        }

        fn required_count(&self) -> usize {
            self.required
        }

        fn total_count(&self) -> usize {
            self.total
        }
    }

    fn strategy(repair: i32, optimal: i32) -> Result<RedundancyStrategy> {
        RedundancyStrategy::new(Arc::new(Counts { required: 2, total: 4 }), repair, optimal)
    }

    #[test]
    fn every_valid_pair_is_accepted() {
        for repair in 2..=4 {
            for optimal in repair..=4 {
                let s = strategy(repair, optimal).unwrap();
                assert_eq!(s.repair_threshold(), repair as usize);
                assert_eq!(s.optimal_threshold(), optimal as usize);
            }
        }
    }

    #[test]
    fn zero_thresholds_normalize_to_total() {
        let s = strategy(0, 0).unwrap();
        assert_eq!(s.repair_threshold(), 4);
        assert_eq!(s.optimal_threshold(), 4);

        let s = strategy(3, 0).unwrap();
        assert_eq!(s.repair_threshold(), 3);
        assert_eq!(s.optimal_threshold(), 4);
    }

    #[test]
    fn negative_thresholds_are_rejected() {
        assert!(matches!(strategy(-1, 4), Err(Error::InvalidThreshold(_))));
        assert!(matches!(strategy(2, -1), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn thresholds_below_required_are_rejected() {
        assert!(matches!(strategy(1, 4), Err(Error::InvalidThreshold(_))));
        assert!(matches!(strategy(2, 1), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn thresholds_above_total_are_rejected() {
        assert!(matches!(strategy(5, 5), Err(Error::InvalidThreshold(_))));
        assert!(matches!(strategy(2, 5), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn repair_above_optimal_is_rejected() {
        assert!(matches!(strategy(4, 3), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn accessors_delegate_to_scheme() {
        let s = strategy(2, 3).unwrap();
        assert_eq!(s.required_count(), 2);
        assert_eq!(s.total_count(), 4);
        assert_eq!(s.stripe_size(), 2);
        assert_eq!(s.share_size(), 1);
    }
}
