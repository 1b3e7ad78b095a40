use strata_block::Page;
use strata_result::{Error, Result};
use strata_types::{Identity, LogicalType};
use tracing::debug;

use crate::count_only::CountOnlyPageSource;
use crate::memory::MemoryPageSource;
use crate::source::PageSource;

/// The slice of a table one page source reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSplit {
    pub table: String,
    pub row_offset: usize,
    /// Rows to read from `row_offset`; `None` reads to the end.
    pub row_limit: Option<usize>,
}

impl SourceSplit {
    /// The whole of `table`.
    pub fn full(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            row_offset: 0,
            row_limit: None,
        }
    }

    pub fn with_range(mut self, row_offset: usize, row_limit: Option<usize>) -> Self {
        self.row_offset = row_offset;
        self.row_limit = row_limit;
        self
    }
}

/// Creates page sources for splits on behalf of an identity.
pub trait PageSourceProvider: Send + Sync {
    /// A source producing the `columns` of `split`, in that order. An empty
    /// column list asks only for the row count.
    fn create_page_source(
        &self,
        identity: &Identity,
        split: &SourceSplit,
        columns: &[usize],
    ) -> Result<Box<dyn PageSource>>;
}

/// In-memory table served as page sources.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    column_types: Vec<LogicalType>,
    pages: Vec<Page>,
    row_count: usize,
}

impl MemoryTable {
    /// Table of `pages`, each holding one block per entry of `column_types`.
    pub fn new(
        name: impl Into<String>,
        column_types: Vec<LogicalType>,
        pages: Vec<Page>,
    ) -> Result<Self> {
        for (index, page) in pages.iter().enumerate() {
            let actual: Vec<LogicalType> = page.columns().iter().map(|b| b.logical_type()).collect();
            if actual != column_types {
                return Err(Error::InvalidArgumentError(format!(
                    "page {index} has column types {actual:?}, table declares {column_types:?}"
                )));
            }
        }
        let row_count = pages.iter().map(Page::row_count).sum();
        Ok(Self {
            name: name.into(),
            column_types,
            pages,
            row_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_types(&self) -> &[LogicalType] {
        &self.column_types
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Rows of the split's range, clamped to the table.
    fn split_rows(&self, split: &SourceSplit) -> (usize, usize) {
        let start = split.row_offset.min(self.row_count);
        let available = self.row_count - start;
        let len = split.row_limit.map_or(available, |limit| limit.min(available));
        (start, start + len)
    }

    /// Pages covering rows `[start, end)`, projected to `columns`. Pages are
    /// sliced, never copied.
    fn slice_pages(&self, start: usize, end: usize, columns: &[usize]) -> Result<Vec<Page>> {
        let mut out = Vec::new();
        let mut page_start = 0usize;
        for page in &self.pages {
            let page_end = page_start + page.row_count();
            let lo = start.max(page_start);
            let hi = end.min(page_end);
            if lo < hi {
                let view = if lo == page_start && hi == page_end {
                    page.clone()
                } else {
                    page.slice(lo - page_start, hi - lo)?
                };
                out.push(view.project(columns)?);
            }
            page_start = page_end;
            if page_start >= end {
                break;
            }
        }
        Ok(out)
    }
}

impl PageSourceProvider for MemoryTable {
    fn create_page_source(
        &self,
        identity: &Identity,
        split: &SourceSplit,
        columns: &[usize],
    ) -> Result<Box<dyn PageSource>> {
        if split.table != self.name {
            return Err(Error::InvalidArgumentError(format!(
                "split for table {} sent to table {}",
                split.table, self.name
            )));
        }
        if let Some(&column) = columns.iter().find(|&&c| c >= self.column_types.len()) {
            return Err(Error::ColumnOutOfRange {
                column,
                count: self.column_types.len(),
            });
        }

        let (start, end) = self.split_rows(split);
        debug!(
            table = %self.name,
            %identity,
            rows = end - start,
            columns = columns.len(),
            "creating page source"
        );
        if columns.is_empty() {
            return Ok(Box::new(CountOnlyPageSource::new(end - start)));
        }
        Ok(Box::new(MemoryPageSource::new(
            self.slice_pages(start, end, columns)?,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_block::BlockBuilder;

    fn table() -> MemoryTable {
        let pages = [0..4i64, 4..10]
            .into_iter()
            .map(|range| {
                let mut ids = BlockBuilder::new(LogicalType::BigInt, 8);
                let mut flags = BlockBuilder::new(LogicalType::Boolean, 8);
                for v in range {
                    ids.append_i64(v).unwrap();
                    flags.append_bool(v % 2 == 0).unwrap();
                }
                Page::from_blocks(vec![ids.finish(), flags.finish()]).unwrap()
            })
            .collect();
        MemoryTable::new(
            "numbers",
            vec![LogicalType::BigInt, LogicalType::Boolean],
            pages,
        )
        .unwrap()
    }

    fn collect_ids(mut source: Box<dyn PageSource>) -> Vec<i64> {
        let mut ids = Vec::new();
        while !source.is_finished() {
            if let Some(page) = source.next_page().unwrap() {
                let block = page.column(0).unwrap();
                for pos in 0..page.row_count() {
                    ids.push(block.i64_at(pos).unwrap().unwrap());
                }
            }
        }
        source.close().unwrap();
        ids
    }

    #[test]
    fn split_ranges_cross_page_boundaries() {
        let table = table();
        let split = SourceSplit::full("numbers").with_range(2, Some(5));
        let source = table
            .create_page_source(&Identity::none(), &split, &[0])
            .unwrap();
        assert_eq!(collect_ids(source), vec![2, 3, 4, 5, 6]);

        let split = SourceSplit::full("numbers").with_range(8, Some(100));
        let source = table
            .create_page_source(&Identity::for_user("alice"), &split, &[0, 1])
            .unwrap();
        assert_eq!(collect_ids(source), vec![8, 9]);
    }

    #[test]
    fn empty_projection_is_count_only() {
        let table = table();
        let split = SourceSplit::full("numbers").with_range(3, None);
        let mut source = table
            .create_page_source(&Identity::none(), &split, &[])
            .unwrap();
        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.row_count(), 7);
        assert_eq!(page.column_count(), 0);
        assert!(source.is_finished());
    }

    #[test]
    fn projection_reorders_and_validates_columns() {
        let table = table();
        let split = SourceSplit::full("numbers");
        let mut source = table
            .create_page_source(&Identity::none(), &split, &[1, 0])
            .unwrap();
        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.column(0).unwrap().logical_type(), LogicalType::Boolean);

        assert!(matches!(
            table.create_page_source(&Identity::none(), &split, &[2]),
            Err(Error::ColumnOutOfRange {
                column: 2,
                count: 2
            })
        ));
        assert!(
            table
                .create_page_source(&Identity::none(), &SourceSplit::full("other"), &[0])
                .is_err()
        );
    }

    #[test]
    fn mismatched_pages_are_rejected() {
        let err = MemoryTable::new("t", vec![LogicalType::Uuid], vec![Page::with_row_count(1)]);
        assert!(err.is_err());
    }
}
