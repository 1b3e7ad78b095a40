//! Whole-block kernels built on a resolved [`TypeOperators`].
//!
//! Callers resolve the operator set once and hand it to these loops, so
//! per-position work is a single virtual call.

use std::cmp::Ordering;

use strata_block::{Block, BlockBuilder};
use strata_result::{Error, Result};
use strata_types::LogicalType;

use crate::operators::{NULL_HASH, SortOrder, TypeOperators};

/// Hash of every position; null positions hash to [`NULL_HASH`].
pub fn hash_block(ops: &dyn TypeOperators, block: &Block) -> Result<Vec<u64>> {
    (0..block.position_count())
        .map(|position| Ok(ops.hash_or_null(block, position)?.unwrap_or(NULL_HASH)))
        .collect()
}

/// Positions of `block` in `ORDER BY` order. The sort is stable, so equal
/// keys keep their input order.
pub fn sort_positions(
    ops: &dyn TypeOperators,
    block: &Block,
    order: SortOrder,
) -> Result<Vec<usize>> {
    let mut positions: Vec<usize> = (0..block.position_count()).collect();
    let mut failure: Option<Error> = None;
    positions.sort_by(|&a, &b| {
        if failure.is_some() {
            return Ordering::Equal;
        }
        ops.compare_for_sort(block, a, block, b, order)
            .unwrap_or_else(|err| {
                failure = Some(err);
                Ordering::Equal
            })
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(positions),
    }
}

/// `left IS DISTINCT FROM right`, position by position, as a boolean block.
pub fn distinct_from_block(ops: &dyn TypeOperators, left: &Block, right: &Block) -> Result<Block> {
    if left.position_count() != right.position_count() {
        return Err(Error::InvalidArgumentError(format!(
            "cannot compare blocks of {} and {} positions",
            left.position_count(),
            right.position_count()
        )));
    }
    let mut builder = BlockBuilder::new(LogicalType::Boolean, left.position_count());
    for position in 0..left.position_count() {
        builder.append_bool(ops.is_distinct_from(left, position, right, position)?)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BigIntOperators, DoubleOperators};

    fn bigints(values: &[Option<i64>]) -> Block {
        let mut builder = BlockBuilder::new(LogicalType::BigInt, values.len());
        for v in values {
            match v {
                Some(v) => builder.append_i64(*v).unwrap(),
                None => builder.append_null(),
            }
        }
        builder.finish()
    }

    #[test]
    fn sort_honours_direction_and_null_placement() {
        let block = bigints(&[Some(3), None, Some(1), Some(2)]);
        let ops = BigIntOperators::new();
        assert_eq!(
            sort_positions(&ops, &block, SortOrder::ASC_NULLS_LAST).unwrap(),
            vec![2, 3, 0, 1]
        );
        assert_eq!(
            sort_positions(&ops, &block, SortOrder::DESC_NULLS_FIRST).unwrap(),
            vec![1, 0, 3, 2]
        );
    }

    #[test]
    fn sort_reports_operator_failures() {
        let block = bigints(&[Some(1), Some(2)]);
        assert!(sort_positions(&DoubleOperators, &block, SortOrder::default()).is_err());
    }

    #[test]
    fn null_positions_hash_to_the_sentinel() {
        let block = bigints(&[Some(9), None]);
        let hashes = hash_block(&BigIntOperators::new(), &block).unwrap();
        assert_eq!(hashes[1], NULL_HASH);
        assert_eq!(
            hashes[0],
            BigIntOperators::new().hash(&block, 0).unwrap()
        );
    }

    #[test]
    fn distinct_from_treats_nulls_as_values() {
        let left = bigints(&[None, None, Some(1), Some(1)]);
        let right = bigints(&[None, Some(1), Some(1), Some(2)]);
        let out = distinct_from_block(&BigIntOperators::new(), &left, &right).unwrap();
        let flags: Vec<_> = (0..4).map(|p| out.bool_at(p).unwrap().unwrap()).collect();
        assert_eq!(flags, vec![false, true, false, true]);

        let short = bigints(&[None]);
        assert!(distinct_from_block(&BigIntOperators::new(), &left, &short).is_err());
    }
}
