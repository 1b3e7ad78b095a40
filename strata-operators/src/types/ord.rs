use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use strata_block::Block;
use strata_result::Result;
use strata_types::{BoolCodec, Codec, LeI64, LogicalType};

use crate::operators::{TypeOperators, fx_hash, payload};

/// A logical type whose decoded values have a natural total order with no
/// incomparable members.
pub trait NaturalOrder: Send + Sync + 'static {
    const LOGICAL_TYPE: LogicalType;

    type Value<'a>: Ord + Hash;

    fn read(raw: &[u8]) -> Result<Self::Value<'_>>;
}

/// [`TypeOperators`] for any [`NaturalOrder`] type. Both compare variants
/// coincide.
pub struct OrdOperators<K> {
    _kind: PhantomData<fn() -> K>,
}

impl<K: NaturalOrder> OrdOperators<K> {
    pub const fn new() -> Self {
        Self { _kind: PhantomData }
    }

    #[inline]
    fn value(block: &Block, position: usize) -> Result<K::Value<'_>> {
        K::read(payload(block, position, K::LOGICAL_TYPE)?)
    }

    #[inline]
    fn compare(left: &Block, lp: usize, right: &Block, rp: usize) -> Result<Ordering> {
        Ok(Self::value(left, lp)?.cmp(&Self::value(right, rp)?))
    }
}

impl<K: NaturalOrder> Default for OrdOperators<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NaturalOrder> fmt::Debug for OrdOperators<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrdOperators({})", K::LOGICAL_TYPE)
    }
}

impl<K: NaturalOrder> TypeOperators for OrdOperators<K> {
    fn logical_type(&self) -> LogicalType {
        K::LOGICAL_TYPE
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
        Self::compare(left, lp, right, rp)
    }

    fn compare_ordered_first(
        &self,
        left: &Block,
        lp: usize,
        right: &Block,
        rp: usize,
    ) -> Result<Ordering> {
        Self::compare(left, lp, right, rp)
    }

    fn hash(&self, block: &Block, position: usize) -> Result<u64> {
        Ok(fx_hash(&Self::value(block, position)?))
    }
}

pub struct BooleanValues;

impl NaturalOrder for BooleanValues {
    const LOGICAL_TYPE: LogicalType = LogicalType::Boolean;
    type Value<'a> = bool;

    fn read(raw: &[u8]) -> Result<bool> {
        Ok(BoolCodec::decode(raw)?)
    }
}

pub struct BigIntValues;

impl NaturalOrder for BigIntValues {
    const LOGICAL_TYPE: LogicalType = LogicalType::BigInt;
    type Value<'a> = i64;

    fn read(raw: &[u8]) -> Result<i64> {
        Ok(LeI64::decode(raw)?)
    }
}

/// UTF-8 byte order equals code point order, so text compares as bytes.
pub struct VarcharValues;

impl NaturalOrder for VarcharValues {
    const LOGICAL_TYPE: LogicalType = LogicalType::Varchar;
    type Value<'a> = &'a [u8];

    fn read(raw: &[u8]) -> Result<&[u8]> {
        Ok(raw)
    }
}

pub struct VarbinaryValues;

impl NaturalOrder for VarbinaryValues {
    const LOGICAL_TYPE: LogicalType = LogicalType::Varbinary;
    type Value<'a> = &'a [u8];

    fn read(raw: &[u8]) -> Result<&[u8]> {
        Ok(raw)
    }
}

pub type BooleanOperators = OrdOperators<BooleanValues>;
pub type BigIntOperators = OrdOperators<BigIntValues>;
pub type VarcharOperators = OrdOperators<VarcharValues>;
pub type VarbinaryOperators = OrdOperators<VarbinaryValues>;

#[cfg(test)]
mod tests {
    use super::*;
    use strata_block::BlockBuilder;

    #[test]
    fn bigint_orders_signed() {
        let mut builder = BlockBuilder::new(LogicalType::BigInt, 2);
        builder.append_i64(-5).unwrap();
        builder.append_i64(3).unwrap();
        let block = builder.finish();
        let ops = BigIntOperators::new();

        assert_eq!(
            ops.compare_ordered_last(&block, 0, &block, 1).unwrap(),
            Ordering::Less
        );
        assert!(!ops.equal(&block, 0, &block, 1).unwrap());
        assert_eq!(ops.logical_type(), LogicalType::BigInt);
        assert_eq!(format!("{ops:?}"), "OrdOperators(bigint)");
    }

    #[test]
    fn varchar_compares_by_code_point() {
        let mut builder = BlockBuilder::new(LogicalType::Varchar, 3);
        builder.append_str("Zebra").unwrap();
        builder.append_str("apple").unwrap();
        builder.append_str("\u{e9}clair").unwrap();
        let block = builder.finish();
        let ops = VarcharOperators::new();

        assert_eq!(
            ops.compare_ordered_first(&block, 0, &block, 1).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            ops.compare_ordered_first(&block, 1, &block, 2).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn operators_reject_foreign_blocks() {
        let mut builder = BlockBuilder::new(LogicalType::Boolean, 1);
        builder.append_bool(true).unwrap();
        let block = builder.finish();
        assert!(BigIntOperators::new().hash(&block, 0).is_err());
        assert!(BooleanOperators::new().hash(&block, 0).is_ok());
    }
}
