use std::sync::Arc;

use strata_result::{Error, Result};

use crate::block::Block;

/// A row batch: one [`Block`] per output column, all of `row_count` positions.
///
/// A page with zero columns is legal. It stands for "`row_count` rows matched,
/// no column values needed", which is what row-counting queries consume.
/// Pages are immutable; projections and slices are new pages over the same
/// block storage.
#[derive(Clone, Debug)]
pub struct Page {
    row_count: usize,
    blocks: Arc<[Block]>,
}

impl Page {
    /// Assemble a page, checking every block has `row_count` positions.
    pub fn new(row_count: usize, blocks: Vec<Block>) -> Result<Self> {
        if let Some((column, block)) = blocks
            .iter()
            .enumerate()
            .find(|(_, block)| block.position_count() != row_count)
        {
            return Err(Error::ShapeMismatch {
                expected: row_count,
                actual: block.position_count(),
                column,
            });
        }
        tracing::trace!(rows = row_count, columns = blocks.len(), "built page");
        Ok(Self {
            row_count,
            blocks: blocks.into(),
        })
    }

    /// Zero-column page carrying only a row count.
    pub fn with_row_count(row_count: usize) -> Self {
        Self {
            row_count,
            blocks: Arc::from(Vec::new()),
        }
    }

    /// Assemble a page from at least one block, taking the row count from the
    /// first block.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        let row_count = blocks
            .first()
            .map(Block::position_count)
            .ok_or_else(|| {
                Error::InvalidArgumentError(
                    "cannot derive a row count from zero columns; use Page::with_row_count".into(),
                )
            })?;
        Self::new(row_count, blocks)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column(&self, column: usize) -> Result<&Block> {
        self.blocks.get(column).ok_or(Error::ColumnOutOfRange {
            column,
            count: self.blocks.len(),
        })
    }

    #[inline]
    pub fn columns(&self) -> &[Block] {
        &self.blocks
    }

    /// Page holding `columns` of this page, in the given order.
    ///
    /// An empty projection yields a zero-column page with the same row count.
    pub fn project(&self, columns: &[usize]) -> Result<Self> {
        let blocks = columns
            .iter()
            .map(|&column| self.column(column).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            row_count: self.row_count,
            blocks: blocks.into(),
        })
    }

    /// Rows `[offset, offset + length)` of every column, as views.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Self> {
        match offset.checked_add(length) {
            Some(end) if end <= self.row_count => {}
            _ => {
                return Err(Error::PositionOutOfRange {
                    position: offset.saturating_add(length).saturating_sub(1),
                    count: self.row_count,
                });
            }
        }
        let blocks = self
            .blocks
            .iter()
            .map(|block| block.slice(offset, length))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            row_count: length,
            blocks: blocks.into(),
        })
    }

    /// Bytes retained by all column views.
    pub fn size_in_bytes(&self) -> usize {
        self.blocks.iter().map(Block::size_in_bytes).sum()
    }
}
