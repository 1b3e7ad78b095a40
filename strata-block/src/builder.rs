use arrow_buffer::{BooleanBufferBuilder, Buffer, MutableBuffer, NullBuffer, OffsetBuffer, ScalarBuffer};
use strata_result::{Error, Result};
use strata_types::{BeU128, BoolCodec, Codec, LeF64, LeI64, LogicalType};

use crate::block::{Block, BlockValues};

/// Byte-size guess per position for variable-width capacity reservation.
const VARIABLE_WIDTH_BYTES_HINT: usize = 16;

/// Append-only staging area for one [`Block`].
///
/// Positions are declared in order with [`append_null`](Self::append_null)
/// and [`append_value`](Self::append_value); a declared position is never
/// revisited. [`finish`](Self::finish) consumes the builder, so no handle can
/// mutate the block after it is sealed. A builder has a single writer.
#[derive(Debug)]
pub struct BlockBuilder {
    logical_type: LogicalType,
    width: Option<usize>,
    position_count: usize,
    values: MutableBuffer,
    /// Variable-width only; starts as `[0]`.
    offsets: Vec<i32>,
    /// Materialized on the first null so all-valid blocks carry no bitmap.
    nulls: Option<BooleanBufferBuilder>,
    capacity_hint: usize,
}

impl BlockBuilder {
    /// Capacity used by [`BlockBuilder::with_default_capacity`].
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Largest number of positions reserved up front; bigger hints grow on demand.
    pub const MAX_RESERVED_POSITIONS: usize = Self::DEFAULT_CAPACITY * 64;

    /// Create a builder. `capacity_hint` pre-sizes storage and never caps the
    /// number of positions.
    pub fn new(logical_type: LogicalType, capacity_hint: usize) -> Self {
        let capacity_hint = capacity_hint.min(Self::MAX_RESERVED_POSITIONS);
        let width = logical_type.fixed_width();
        let (values, offsets) = match width {
            Some(width) => (
                MutableBuffer::with_capacity(capacity_hint.saturating_mul(width)),
                Vec::new(),
            ),
            None => {
                let mut offsets = Vec::with_capacity(capacity_hint.saturating_add(1));
                offsets.push(0);
                (
                    MutableBuffer::with_capacity(
                        capacity_hint.saturating_mul(VARIABLE_WIDTH_BYTES_HINT),
                    ),
                    offsets,
                )
            }
        };
        Self {
            logical_type,
            width,
            position_count: 0,
            values,
            offsets,
            nulls: None,
            capacity_hint,
        }
    }

    pub fn with_default_capacity(logical_type: LogicalType) -> Self {
        Self::new(logical_type, Self::DEFAULT_CAPACITY)
    }

    #[inline]
    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    /// Number of positions declared so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.position_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position_count == 0
    }

    /// Declare the next position null.
    pub fn append_null(&mut self) {
        let position_count = self.position_count;
        let capacity = self.capacity_hint.max(position_count + 1);
        self.nulls
            .get_or_insert_with(|| {
                let mut validity = BooleanBufferBuilder::new(capacity);
                validity.append_n(position_count, true);
                validity
            })
            .append(false);

        match self.width {
            Some(width) => self.values.extend_zeros(width),
            None => {
                let offset = self.current_offset();
                self.offsets.push(offset);
            }
        }
        self.position_count += 1;
    }

    /// Declare the next position non-null with payload `raw`.
    ///
    /// Fixed-width types require `raw.len()` to equal the declared width.
    /// `Boolean` payloads must be 0 or 1 and `Varchar` payloads must be valid
    /// UTF-8. On failure nothing is appended.
    pub fn append_value(&mut self, raw: &[u8]) -> Result<()> {
        match self.width {
            Some(width) => {
                if raw.len() != width {
                    return Err(Error::WidthMismatch {
                        logical_type: self.logical_type.name(),
                        expected: width,
                        actual: raw.len(),
                    });
                }
                if self.logical_type == LogicalType::Boolean && raw[0] > 1 {
                    return Err(Error::InvalidArgumentError(format!(
                        "boolean payload must be 0 or 1, got {}",
                        raw[0]
                    )));
                }
                self.values.extend_from_slice(raw);
            }
            None => {
                if self.logical_type == LogicalType::Varchar && std::str::from_utf8(raw).is_err() {
                    return Err(Error::InvalidArgumentError(
                        "varchar payload is not valid UTF-8".into(),
                    ));
                }
                let end = self
                    .values
                    .len()
                    .checked_add(raw.len())
                    .and_then(|end| i32::try_from(end).ok())
                    .ok_or_else(|| {
                        Error::InvalidArgumentError(format!(
                            "{} block exceeds {} payload bytes",
                            self.logical_type,
                            i32::MAX
                        ))
                    })?;
                self.values.extend_from_slice(raw);
                self.offsets.push(end);
            }
        }

        if let Some(validity) = self.nulls.as_mut() {
            validity.append(true);
        }
        self.position_count += 1;
        Ok(())
    }

    /// Append `raw`, or a null when `None`.
    pub fn append_option(&mut self, raw: Option<&[u8]>) -> Result<()> {
        match raw {
            Some(raw) => self.append_value(raw),
            None => {
                self.append_null();
                Ok(())
            }
        }
    }

    /// Copy `position` of `block` (null or value) as the next position.
    pub fn append_from(&mut self, block: &Block, position: usize) -> Result<()> {
        if block.logical_type() != self.logical_type {
            return Err(Error::TypeMismatch {
                expected: self.logical_type.name(),
                actual: block.logical_type().name(),
            });
        }
        let raw = block.raw_or_null(position)?;
        self.append_option(raw)
    }

    fn check_type(&self, expected: LogicalType) -> Result<()> {
        if self.logical_type == expected {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                expected: expected.name(),
                actual: self.logical_type.name(),
            })
        }
    }

    /// Encode `value` with the codec of the builder's type and append it.
    pub fn append_typed<C: Codec>(&mut self, value: C::Owned) -> Result<()> {
        self.check_type(C::LOGICAL_TYPE)?;
        self.append_value(C::encode(value).as_ref())
    }

    pub fn append_bool(&mut self, value: bool) -> Result<()> {
        self.append_typed::<BoolCodec>(value)
    }

    pub fn append_i64(&mut self, value: i64) -> Result<()> {
        self.append_typed::<LeI64>(value)
    }

    pub fn append_f64(&mut self, value: f64) -> Result<()> {
        self.append_typed::<LeF64>(value)
    }

    pub fn append_uuid(&mut self, value: u128) -> Result<()> {
        self.append_typed::<BeU128>(value)
    }

    pub fn append_str(&mut self, value: &str) -> Result<()> {
        self.check_type(LogicalType::Varchar)?;
        self.append_value(value.as_bytes())
    }

    pub fn append_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.check_type(LogicalType::Varbinary)?;
        self.append_value(value)
    }

    #[inline]
    fn current_offset(&self) -> i32 {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Seal the builder into an immutable [`Block`].
    pub fn finish(self) -> Block {
        let Self {
            logical_type,
            width,
            position_count,
            values,
            offsets,
            nulls,
            ..
        } = self;

        let data: Buffer = values.into();
        let values = match width {
            Some(width) => BlockValues::Fixed { width, data },
            // Offsets are monotonically non-decreasing and start at zero by
            // construction, which is what `OffsetBuffer::new` asserts.
            None => BlockValues::Variable {
                offsets: OffsetBuffer::new(ScalarBuffer::from(offsets)),
                data,
            },
        };
        let nulls = nulls.map(|mut validity| NullBuffer::new(validity.finish()));

        tracing::trace!(
            logical_type = %logical_type,
            positions = position_count,
            nulls = nulls.as_ref().map_or(0, NullBuffer::null_count),
            "sealed block"
        );
        Block::from_parts(logical_type, position_count, values, nulls)
    }
}
