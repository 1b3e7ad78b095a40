//! Conversions between strata blocks/pages and arrow arrays/record batches.
//!
//! Export reuses block buffers directly (booleans are the exception: arrow
//! bit-packs them). Import copies positions through a [`BlockBuilder`] so
//! sliced or oddly aligned arrow inputs need no special handling.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, FixedSizeBinaryArray, Float64Array, Int64Array,
    RecordBatch, RecordBatchOptions, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow_buffer::{BooleanBuffer, ScalarBuffer};
use strata_result::{Error, Result};
use strata_types::{LogicalType, UUID_WIDTH};

use crate::block::{Block, BlockValues};
use crate::builder::BlockBuilder;
use crate::page::Page;

/// Arrow data type a block of `logical_type` exports as.
pub fn arrow_data_type(logical_type: LogicalType) -> DataType {
    match logical_type {
        LogicalType::Boolean => DataType::Boolean,
        LogicalType::BigInt => DataType::Int64,
        LogicalType::Double => DataType::Float64,
        LogicalType::Uuid => DataType::FixedSizeBinary(UUID_WIDTH as i32),
        LogicalType::Varchar => DataType::Utf8,
        LogicalType::Varbinary => DataType::Binary,
    }
}

/// Nullable schema with columns named `c0`, `c1`, ...
pub fn schema_for(types: &[LogicalType]) -> SchemaRef {
    let fields: Vec<Field> = types
        .iter()
        .enumerate()
        .map(|(idx, ty)| Field::new(format!("c{idx}"), arrow_data_type(*ty), true))
        .collect();
    Arc::new(Schema::new(fields))
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, logical_type: LogicalType) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::InvalidArgumentError(format!(
            "cannot import arrow {} as {}",
            array.data_type(),
            logical_type
        ))
    })
}

impl Block {
    /// Export as an arrow array sharing this block's buffers.
    pub fn to_arrow(&self) -> Result<ArrayRef> {
        let nulls = self.nulls().cloned();
        let len = self.position_count();
        let array: ArrayRef = match (self.logical_type(), self.values()) {
            (LogicalType::Uuid, BlockValues::Fixed { width, data }) => Arc::new(
                FixedSizeBinaryArray::try_new(*width as i32, data.clone(), nulls)?,
            ),
            (LogicalType::BigInt, BlockValues::Fixed { data, .. }) => Arc::new(
                Int64Array::try_new(ScalarBuffer::new(data.clone(), 0, len), nulls)?,
            ),
            (LogicalType::Double, BlockValues::Fixed { data, .. }) => Arc::new(
                Float64Array::try_new(ScalarBuffer::new(data.clone(), 0, len), nulls)?,
            ),
            (LogicalType::Boolean, BlockValues::Fixed { data, .. }) => {
                let bits: BooleanBuffer = data.as_slice().iter().map(|b| *b != 0).collect();
                Arc::new(BooleanArray::new(bits, nulls))
            }
            (LogicalType::Varchar, BlockValues::Variable { offsets, data }) => Arc::new(
                StringArray::try_new(offsets.clone(), data.clone(), nulls)?,
            ),
            (LogicalType::Varbinary, BlockValues::Variable { offsets, data }) => Arc::new(
                BinaryArray::try_new(offsets.clone(), data.clone(), nulls)?,
            ),
            (logical_type, _) => {
                return Err(Error::Internal(format!(
                    "{logical_type} block has mismatched storage layout"
                )));
            }
        };
        Ok(array)
    }

    /// Import an arrow array whose data type matches `logical_type`.
    pub fn from_arrow(logical_type: LogicalType, array: &dyn Array) -> Result<Self> {
        let expected = arrow_data_type(logical_type);
        if array.data_type() != &expected {
            return Err(Error::InvalidArgumentError(format!(
                "cannot import arrow {} as {} (expected {})",
                array.data_type(),
                logical_type,
                expected
            )));
        }

        let len = array.len();
        let mut builder = BlockBuilder::new(logical_type, len);
        match logical_type {
            LogicalType::Uuid => {
                let typed = downcast::<FixedSizeBinaryArray>(array, logical_type)?;
                for idx in 0..len {
                    builder.append_option(typed.is_valid(idx).then(|| typed.value(idx)))?;
                }
            }
            LogicalType::BigInt => {
                let typed = downcast::<Int64Array>(array, logical_type)?;
                for value in typed.iter() {
                    match value {
                        Some(v) => builder.append_i64(v)?,
                        None => builder.append_null(),
                    }
                }
            }
            LogicalType::Double => {
                let typed = downcast::<Float64Array>(array, logical_type)?;
                for value in typed.iter() {
                    match value {
                        Some(v) => builder.append_f64(v)?,
                        None => builder.append_null(),
                    }
                }
            }
            LogicalType::Boolean => {
                let typed = downcast::<BooleanArray>(array, logical_type)?;
                for value in typed.iter() {
                    match value {
                        Some(v) => builder.append_bool(v)?,
                        None => builder.append_null(),
                    }
                }
            }
            LogicalType::Varchar => {
                let typed = downcast::<StringArray>(array, logical_type)?;
                for value in typed.iter() {
                    builder.append_option(value.map(str::as_bytes))?;
                }
            }
            LogicalType::Varbinary => {
                let typed = downcast::<BinaryArray>(array, logical_type)?;
                for value in typed.iter() {
                    builder.append_option(value)?;
                }
            }
        }
        Ok(builder.finish())
    }
}

impl Page {
    /// Export as a record batch. Zero-column pages keep their row count.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let types: Vec<LogicalType> = self.columns().iter().map(Block::logical_type).collect();
        let columns = self
            .columns()
            .iter()
            .map(Block::to_arrow)
            .collect::<Result<Vec<_>>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(self.row_count()));
        Ok(RecordBatch::try_new_with_options(
            schema_for(&types),
            columns,
            &options,
        )?)
    }

    /// Import a record batch, one logical type per column.
    pub fn from_record_batch(types: &[LogicalType], batch: &RecordBatch) -> Result<Self> {
        if types.len() != batch.num_columns() {
            return Err(Error::InvalidArgumentError(format!(
                "record batch has {} columns but {} types were given",
                batch.num_columns(),
                types.len()
            )));
        }
        let blocks = types
            .iter()
            .zip(batch.columns())
            .map(|(ty, column)| Block::from_arrow(*ty, column.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Page::new(batch.num_rows(), blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_blocks_export_as_fixed_size_binary() {
        let mut builder = BlockBuilder::new(LogicalType::Uuid, 2);
        builder.append_uuid(0x0102).unwrap();
        builder.append_null();
        let block = builder.finish();

        let array = block.to_arrow().unwrap();
        let typed = array
            .as_any()
            .downcast_ref::<FixedSizeBinaryArray>()
            .unwrap();
        assert_eq!(typed.value_length(), 16);
        assert_eq!(typed.value(0)[14..], [0x01, 0x02]);
        assert!(typed.is_null(1));

        let back = Block::from_arrow(LogicalType::Uuid, array.as_ref()).unwrap();
        assert_eq!(back.uuid_at(0).unwrap(), Some(0x0102));
        assert_eq!(back.uuid_at(1).unwrap(), None);
    }

    #[test]
    fn sliced_blocks_export_only_their_view() {
        let mut builder = BlockBuilder::new(LogicalType::BigInt, 4);
        for v in [1, 2, 3, 4] {
            builder.append_i64(v).unwrap();
        }
        let view = builder.finish().slice(2, 2).unwrap();
        let array = view.to_arrow().unwrap();
        let typed = array.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(typed.values().as_ref(), &[3, 4]);
    }

    #[test]
    fn zero_column_pages_keep_row_count_in_arrow() {
        let batch = Page::with_row_count(7).to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 7);
        assert_eq!(batch.num_columns(), 0);

        let page = Page::from_record_batch(&[], &batch).unwrap();
        assert_eq!(page.row_count(), 7);
    }

    #[test]
    fn mismatched_arrow_types_are_rejected() {
        let array = Int64Array::from(vec![1, 2]);
        assert!(Block::from_arrow(LogicalType::Uuid, &array).is_err());
    }
}
