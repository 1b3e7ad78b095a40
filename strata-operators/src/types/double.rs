use std::cmp::Ordering;

use strata_block::Block;
use strata_result::Result;
use strata_types::{Codec, LeF64, LogicalType};

use crate::operators::{TypeOperators, fx_hash, payload};

/// Operators for `double`.
///
/// Equality is IEEE: `NaN != NaN` and `-0.0 == 0.0`. NaN is the incomparable
/// value of the type and is where the two compare variants differ: it sorts
/// after every number under `compare_ordered_last` and before every number
/// under `compare_ordered_first`. Hashing canonicalises signed zero and NaN
/// payloads so grouping treats all NaNs as one value.
#[derive(Debug, Default, Clone, Copy)]
pub struct DoubleOperators;

impl DoubleOperators {
    #[inline]
    fn value(block: &Block, position: usize) -> Result<f64> {
        Ok(LeF64::decode(payload(block, position, LogicalType::Double)?)?)
    }

    /// Total order over doubles with NaN placed per `nan_last`.
    #[inline]
    fn compare(left: f64, right: f64, nan_last: bool) -> Ordering {
        match (left.is_nan(), right.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) if nan_last => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, true) if nan_last => Ordering::Less,
            (false, true) => Ordering::Greater,
            // Neither side is NaN, so `partial_cmp` is total here.
            (false, false) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        }
    }

    #[inline]
    fn canonical_bits(value: f64) -> u64 {
        if value.is_nan() {
            f64::NAN.to_bits()
        } else if value == 0.0 {
            0
        } else {
            value.to_bits()
        }
    }
}

impl TypeOperators for DoubleOperators {
    fn logical_type(&self) -> LogicalType {
        LogicalType::Double
    }

    fn equal(&self, left: &Block, lp: usize, right: &Block, rp: usize) -> Result<bool> {
        Ok(Self::value(left, lp)? == Self::value(right, rp)?)
    }

    fn compare_ordered_last(
        &self,
        left: &Block,
        lp: usize,
        right: &Block,
        rp: usize,
    ) -> Result<Ordering> {
        Ok(Self::compare(
            Self::value(left, lp)?,
            Self::value(right, rp)?,
            true,
        ))
    }

    fn compare_ordered_first(
        &self,
        left: &Block,
        lp: usize,
        right: &Block,
        rp: usize,
    ) -> Result<Ordering> {
        Ok(Self::compare(
            Self::value(left, lp)?,
            Self::value(right, rp)?,
            false,
        ))
    }

    fn hash(&self, block: &Block, position: usize) -> Result<u64> {
        Ok(fx_hash(&Self::canonical_bits(Self::value(block, position)?)))
    }

    /// NaN is not distinct from NaN even though it is not equal to it.
    fn is_distinct_from(&self, left: &Block, lp: usize, right: &Block, rp: usize) -> Result<bool> {
        match (left.is_null(lp)?, right.is_null(rp)?) {
            (true, true) => Ok(false),
            (true, false) | (false, true) => Ok(true),
            (false, false) => {
                let (l, r) = (Self::value(left, lp)?, Self::value(right, rp)?);
                Ok(!(l == r || (l.is_nan() && r.is_nan())))
            }
        }
    }
}
