use std::fmt;

use strata_block::{Block, BlockBuilder};
use strata_result::{CastError, Result};
use strata_types::{BoolCodec, Codec, LeF64, LeI64, LogicalType};

use crate::operators::check_block_type;

/// Conversion of one non-null payload of the source type into a payload of
/// the target type.
pub type CastFn = fn(&[u8]) -> std::result::Result<Vec<u8>, CastError>;

/// A pure conversion between two logical types.
#[derive(Clone, Copy)]
pub struct CastOperator {
    source: LogicalType,
    target: LogicalType,
    function: CastFn,
}

impl CastOperator {
    pub const fn new(source: LogicalType, target: LogicalType, function: CastFn) -> Self {
        Self {
            source,
            target,
            function,
        }
    }

    #[inline]
    pub fn source(&self) -> LogicalType {
        self.source
    }

    #[inline]
    pub fn target(&self) -> LogicalType {
        self.target
    }

    /// Convert a single payload.
    #[inline]
    pub fn cast_raw(&self, raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
        (self.function)(raw)
    }

    /// Convert every position of `block`. Nulls stay null; the first failing
    /// position aborts the whole cast.
    pub fn cast_block(&self, block: &Block) -> Result<Block> {
        check_block_type(block, self.source)?;
        let mut builder = BlockBuilder::new(self.target, block.position_count());
        for position in 0..block.position_count() {
            match block.raw_or_null(position)? {
                Some(raw) => builder.append_value(&self.cast_raw(raw)?)?,
                None => builder.append_null(),
            }
        }
        Ok(builder.finish())
    }
}

impl fmt::Debug for CastOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastOperator({} -> {})", self.source, self.target)
    }
}

fn text(raw: &[u8], target: LogicalType) -> std::result::Result<&str, CastError> {
    std::str::from_utf8(raw).map_err(|_| CastError::InvalidSource {
        from: LogicalType::Varchar.keyword(),
        target: target.keyword(),
    })
}

fn decode<C: Codec>(raw: &[u8], target: LogicalType) -> std::result::Result<C::Owned, CastError> {
    C::decode(raw).map_err(|_| CastError::InvalidSource {
        from: C::LOGICAL_TYPE.keyword(),
        target: target.keyword(),
    })
}

fn bigint_to_varchar(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    Ok(decode::<LeI64>(raw, LogicalType::Varchar)?
        .to_string()
        .into_bytes())
}

/// Surrounding whitespace is ignored; anything else must be a decimal `i64`.
fn varchar_to_bigint(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    let text = text(raw, LogicalType::BigInt)?;
    let value: i64 = text.trim().parse().map_err(|_| CastError::Malformed {
        target: LogicalType::BigInt.keyword(),
        value: text.to_string(),
    })?;
    Ok(LeI64::encode(value).to_vec())
}

fn bigint_to_double(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    let value = decode::<LeI64>(raw, LogicalType::Double)?;
    Ok(LeF64::encode(value as f64).to_vec())
}

fn boolean_to_varchar(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    let value = decode::<BoolCodec>(raw, LogicalType::Varchar)?;
    Ok(if value { b"true".to_vec() } else { b"false".to_vec() })
}

/// The UTF-8 bytes, unchanged.
fn varchar_to_varbinary(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    Ok(raw.to_vec())
}

/// Built-in casts that do not involve UUIDs.
pub fn standard_casts() -> [CastOperator; 5] {
    [
        CastOperator::new(LogicalType::BigInt, LogicalType::Varchar, bigint_to_varchar),
        CastOperator::new(LogicalType::Varchar, LogicalType::BigInt, varchar_to_bigint),
        CastOperator::new(LogicalType::BigInt, LogicalType::Double, bigint_to_double),
        CastOperator::new(LogicalType::Boolean, LogicalType::Varchar, boolean_to_varchar),
        CastOperator::new(
            LogicalType::Varchar,
            LogicalType::Varbinary,
            varchar_to_varbinary,
        ),
    ]
}
