use arrow_buffer::{Buffer, NullBuffer, OffsetBuffer};
use strata_result::{Error, Result};
use strata_types::{BeU128, BoolCodec, Codec, LeF64, LeI64, LogicalType};

use crate::builder::BlockBuilder;

/// Payload storage of a block.
///
/// Both variants hold reference-counted arrow buffers, so cloning or slicing
/// a block never copies payload bytes.
#[derive(Clone, Debug)]
pub(crate) enum BlockValues {
    /// `position_count × width` bytes laid out back to back. `data` is
    /// already sliced to the block's first position.
    Fixed { width: usize, data: Buffer },
    /// `offsets` has `position_count + 1` entries indexing into `data`.
    /// Offsets stay absolute after slicing; `data` is never re-based.
    Variable {
        offsets: OffsetBuffer<i32>,
        data: Buffer,
    },
}

/// Immutable, position-addressable column of one logical type.
///
/// Blocks are only produced by sealing a [`BlockBuilder`] or by deriving a
/// view (slice, gather, arrow import) from existing storage. Every position in
/// `[0, position_count)` is either null or holds one payload. The payload of a
/// null position is unspecified and must not be interpreted.
#[derive(Clone, Debug)]
pub struct Block {
    logical_type: LogicalType,
    position_count: usize,
    values: BlockValues,
    nulls: Option<NullBuffer>,
}

impl Block {
    pub(crate) fn from_parts(
        logical_type: LogicalType,
        position_count: usize,
        values: BlockValues,
        nulls: Option<NullBuffer>,
    ) -> Self {
        debug_assert!(nulls.as_ref().is_none_or(|n| n.len() == position_count));
        Self {
            logical_type,
            position_count,
            values,
            nulls,
        }
    }

    /// Block of `count` null positions.
    pub fn null_block(logical_type: LogicalType, count: usize) -> Self {
        let mut builder = BlockBuilder::new(logical_type, count);
        for _ in 0..count {
            builder.append_null();
        }
        builder.finish()
    }

    /// Block with a single null position.
    pub fn single_null(logical_type: LogicalType) -> Self {
        Self::null_block(logical_type, 1)
    }

    /// Build a block from raw payloads, `None` marking a null position.
    pub fn from_raw_values<'a, I>(logical_type: LogicalType, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        let iter = values.into_iter();
        let mut builder = BlockBuilder::new(logical_type, iter.size_hint().0);
        for value in iter {
            match value {
                Some(raw) => builder.append_value(raw)?,
                None => builder.append_null(),
            }
        }
        Ok(builder.finish())
    }

    #[inline]
    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    #[inline]
    pub fn position_count(&self) -> usize {
        self.position_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position_count == 0
    }

    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, NullBuffer::null_count)
    }

    /// False when the block is known to hold no nulls. Hot loops can skip
    /// per-position null checks on that answer.
    #[inline]
    pub fn may_have_nulls(&self) -> bool {
        self.null_count() > 0
    }

    pub(crate) fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }

    pub(crate) fn values(&self) -> &BlockValues {
        &self.values
    }

    #[inline]
    fn check_position(&self, position: usize) -> Result<()> {
        if position < self.position_count {
            Ok(())
        } else {
            Err(Error::PositionOutOfRange {
                position,
                count: self.position_count,
            })
        }
    }

    /// Whether `position` is null. Fails for positions outside the block.
    #[inline]
    pub fn is_null(&self, position: usize) -> Result<bool> {
        self.check_position(position)?;
        Ok(self.nulls.as_ref().is_some_and(|n| n.is_null(position)))
    }

    /// Payload bytes of `position`.
    ///
    /// Fixed-width blocks return exactly `width` bytes. The bytes of a null
    /// position are unspecified; callers check [`Block::is_null`] first.
    #[inline]
    pub fn raw(&self, position: usize) -> Result<&[u8]> {
        self.check_position(position)?;
        Ok(match &self.values {
            BlockValues::Fixed { width, data } => {
                let start = position * width;
                &data.as_slice()[start..start + width]
            }
            BlockValues::Variable { offsets, data } => {
                let start = offsets[position] as usize;
                let end = offsets[position + 1] as usize;
                &data.as_slice()[start..end]
            }
        })
    }

    /// Payload bytes of `position`, or `None` when it is null.
    #[inline]
    pub fn raw_or_null(&self, position: usize) -> Result<Option<&[u8]>> {
        if self.is_null(position)? {
            Ok(None)
        } else {
            self.raw(position).map(Some)
        }
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

    /// Decode `position` with the codec of the block's type.
    pub fn value<C: Codec>(&self, position: usize) -> Result<Option<C::Owned>> {
        self.check_type(C::LOGICAL_TYPE)?;
        match self.raw_or_null(position)? {
            Some(raw) => Ok(Some(C::decode(raw)?)),
            None => Ok(None),
        }
    }

    pub fn bool_at(&self, position: usize) -> Result<Option<bool>> {
        self.value::<BoolCodec>(position)
    }

    pub fn i64_at(&self, position: usize) -> Result<Option<i64>> {
        self.value::<LeI64>(position)
    }

    pub fn f64_at(&self, position: usize) -> Result<Option<f64>> {
        self.value::<LeF64>(position)
    }

    pub fn uuid_at(&self, position: usize) -> Result<Option<u128>> {
        self.value::<BeU128>(position)
    }

    pub fn str_at(&self, position: usize) -> Result<Option<&str>> {
        self.check_type(LogicalType::Varchar)?;
        match self.raw_or_null(position)? {
            Some(raw) => std::str::from_utf8(raw).map(Some).map_err(Error::internal),
            None => Ok(None),
        }
    }

    pub fn bytes_at(&self, position: usize) -> Result<Option<&[u8]>> {
        self.check_type(LogicalType::Varbinary)?;
        self.raw_or_null(position)
    }

    /// Zero-copy view of `length` positions starting at `offset`.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Self> {
        let end = offset.checked_add(length).ok_or(Error::PositionOutOfRange {
            position: usize::MAX,
            count: self.position_count,
        })?;
        if end > self.position_count {
            return Err(Error::PositionOutOfRange {
                position: end - 1,
                count: self.position_count,
            });
        }

        let values = match &self.values {
            BlockValues::Fixed { width, data } => BlockValues::Fixed {
                width: *width,
                data: data.slice_with_length(offset * width, length * width),
            },
            BlockValues::Variable { offsets, data } => BlockValues::Variable {
                offsets: offsets.slice(offset, length),
                data: data.clone(),
            },
        };
        let nulls = self.nulls.as_ref().map(|n| n.slice(offset, length));
        Ok(Self::from_parts(self.logical_type, length, values, nulls))
    }

    /// Gather `positions` (in the given order, repeats allowed) into a new block.
    pub fn copy_positions(&self, positions: &[usize]) -> Result<Self> {
        let mut builder = BlockBuilder::new(self.logical_type, positions.len());
        for &position in positions {
            builder.append_from(self, position)?;
        }
        Ok(builder.finish())
    }

    /// Bytes retained by this view: payload, offsets and validity bitmap.
    pub fn size_in_bytes(&self) -> usize {
        let payload = match &self.values {
            BlockValues::Fixed { data, .. } => data.len(),
            BlockValues::Variable { offsets, .. } => {
                let first = offsets.first().copied().unwrap_or(0) as usize;
                let last = offsets.last().copied().unwrap_or(0) as usize;
                (last - first) + offsets.len() * size_of::<i32>()
            }
        };
        let bitmap = self
            .nulls
            .as_ref()
            .map_or(0, |n| n.len().div_ceil(8));
        payload + bitmap
    }
}
