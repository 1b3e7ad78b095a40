use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use strata_block::Block;
use strata_result::{Error, Result};
use strata_types::LogicalType;

/// Hash assigned to null positions by block-level kernels.
pub const NULL_HASH: u64 = 0;

/// Direction and null placement of an `ORDER BY` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortOrder {
    pub ascending: bool,
    pub nulls_first: bool,
}

impl SortOrder {
    pub const ASC_NULLS_FIRST: SortOrder = SortOrder::new(true, true);
    pub const ASC_NULLS_LAST: SortOrder = SortOrder::new(true, false);
    pub const DESC_NULLS_FIRST: SortOrder = SortOrder::new(false, true);
    pub const DESC_NULLS_LAST: SortOrder = SortOrder::new(false, false);

    pub const fn new(ascending: bool, nulls_first: bool) -> Self {
        Self {
            ascending,
            nulls_first,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::ASC_NULLS_LAST
    }
}

/// The behavior a logical type supplies to take part in query execution.
///
/// One implementation is registered per [`LogicalType`]. Callers resolve it
/// once per operator instantiation and call it inside their loops; nothing
/// here branches on the concrete type of the block.
///
/// The required methods take non-null positions. Null handling belongs to the
/// caller, or to the provided null-aware methods ([`is_distinct_from`],
/// [`compare_for_sort`], [`hash_or_null`]).
///
/// Invariants every implementation upholds:
/// - `equal(a, b)` implies `hash(a) == hash(b)`;
/// - both compare variants are total orders over non-null values and
///   order ties purely on value bytes;
/// - hashes are stable for the life of the process, not across releases.
///
/// [`is_distinct_from`]: TypeOperators::is_distinct_from
/// [`compare_for_sort`]: TypeOperators::compare_for_sort
/// [`hash_or_null`]: TypeOperators::hash_or_null
pub trait TypeOperators: Send + Sync + fmt::Debug {
    fn logical_type(&self) -> LogicalType;

    fn equal(
        &self,
        left: &Block,
        left_position: usize,
        right: &Block,
        right_position: usize,
    ) -> Result<bool>;

    /// Comparison where incomparable values (NaN for doubles) sort after
    /// every other value.
    fn compare_ordered_last(
        &self,
        left: &Block,
        left_position: usize,
        right: &Block,
        right_position: usize,
    ) -> Result<Ordering>;

    /// Comparison where incomparable values sort before every other value.
    fn compare_ordered_first(
        &self,
        left: &Block,
        left_position: usize,
        right: &Block,
        right_position: usize,
    ) -> Result<Ordering>;

    fn hash(&self, block: &Block, position: usize) -> Result<u64>;

    /// True for values with no well-defined equality result. For scalar
    /// types that is exactly null.
    fn is_indeterminate(&self, block: &Block, position: usize) -> Result<bool> {
        block.is_null(position)
    }

    fn not_equal(
        &self,
        left: &Block,
        left_position: usize,
        right: &Block,
        right_position: usize,
    ) -> Result<bool> {
        self.equal(left, left_position, right, right_position)
            .map(|equal| !equal)
    }

    /// `IS DISTINCT FROM`: two nulls are not distinct, a null and a value are.
    fn is_distinct_from(
        &self,
        left: &Block,
        left_position: usize,
        right: &Block,
        right_position: usize,
    ) -> Result<bool> {
        match (left.is_null(left_position)?, right.is_null(right_position)?) {
            (true, true) => Ok(false),
            (true, false) | (false, true) => Ok(true),
            (false, false) => self.not_equal(left, left_position, right, right_position),
        }
    }

    /// `ORDER BY` comparator.
    ///
    /// Ascending keys use [`compare_ordered_last`]; descending keys reverse
    /// [`compare_ordered_first`]. Incomparable values therefore sort last in
    /// both directions.
    ///
    /// [`compare_ordered_last`]: TypeOperators::compare_ordered_last
    /// [`compare_ordered_first`]: TypeOperators::compare_ordered_first
    fn compare_for_sort(
        &self,
        left: &Block,
        left_position: usize,
        right: &Block,
        right_position: usize,
        order: SortOrder,
    ) -> Result<Ordering> {
        let left_null = left.is_null(left_position)?;
        let right_null = right.is_null(right_position)?;
        if let Some(ordering) = compare_nulls(left_null, right_null, order.nulls_first) {
            return Ok(ordering);
        }
        if order.ascending {
            self.compare_ordered_last(left, left_position, right, right_position)
        } else {
            self.compare_ordered_first(left, left_position, right, right_position)
                .map(Ordering::reverse)
        }
    }

    /// SQL `HASH_CODE`: null in, null out.
    fn hash_or_null(&self, block: &Block, position: usize) -> Result<Option<u64>> {
        if block.is_null(position)? {
            Ok(None)
        } else {
            self.hash(block, position).map(Some)
        }
    }
}

/// Null placement of two null flags, or `None` when both are non-null.
#[inline]
pub fn compare_nulls(left_null: bool, right_null: bool, nulls_first: bool) -> Option<Ordering> {
    match (left_null, right_null) {
        (false, false) => None,
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(if nulls_first {
            Ordering::Less
        } else {
            Ordering::Greater
        }),
        (false, true) => Some(if nulls_first {
            Ordering::Greater
        } else {
            Ordering::Less
        }),
    }
}

/// Fails unless `block` holds values of `expected`.
#[inline]
pub(crate) fn check_block_type(block: &Block, expected: LogicalType) -> Result<()> {
    if block.logical_type() == expected {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: expected.name(),
            actual: block.logical_type().name(),
        })
    }
}

/// Payload of `position` after checking the block's type.
#[inline]
pub(crate) fn payload(block: &Block, position: usize, expected: LogicalType) -> Result<&[u8]> {
    check_block_type(block, expected)?;
    debug_assert!(
        !block.is_null(position).unwrap_or(false),
        "type operators take non-null positions"
    );
    block.raw(position)
}

#[inline]
pub(crate) fn fx_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
