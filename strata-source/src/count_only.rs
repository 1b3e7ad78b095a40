use std::time::Duration;

use strata_block::Page;
use strata_result::Result;
use tracing::debug;

use crate::source::{PageSource, ensure_active};

/// Source for queries that need a row count and no columns.
///
/// Emits exactly one zero-column page carrying `row_count` rows, then
/// finishes. No column storage is allocated and no bytes are reported.
#[derive(Debug)]
pub struct CountOnlyPageSource {
    row_count: usize,
    finished: bool,
}

impl CountOnlyPageSource {
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            finished: false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

impl PageSource for CountOnlyPageSource {
    fn completed_bytes(&self) -> u64 {
        0
    }

    fn read_time(&self) -> Duration {
        Duration::ZERO
    }

    fn memory_usage(&self) -> u64 {
        0
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        ensure_active(self.finished)?;
        self.finished = true;
        debug!(rows = self.row_count, "count-only source emitted its page");
        Ok(Some(Page::with_row_count(self.row_count)))
    }

    fn close(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourcePoll;
    use strata_result::Error;

    #[test]
    fn emits_one_zero_column_page() {
        let mut source = CountOnlyPageSource::new(1000);
        assert!(!source.is_finished());

        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.row_count(), 1000);
        assert_eq!(page.column_count(), 0);
        assert!(source.is_finished());
        assert!(matches!(source.next_page(), Err(Error::SourceFinished)));
        assert_eq!(source.completed_bytes(), 0);
    }

    #[test]
    fn zero_rows_still_produce_a_page() {
        let mut source = CountOnlyPageSource::new(0);
        match source.poll_page().unwrap() {
            SourcePoll::Ready(page) => assert_eq!(page.row_count(), 0),
            other => panic!("expected a page, got {other:?}"),
        }
        assert!(matches!(source.poll_page().unwrap(), SourcePoll::Finished));
    }

    #[test]
    fn close_before_production_finishes_the_source() {
        let mut source = CountOnlyPageSource::new(5);
        source.close().unwrap();
        source.close().unwrap();
        assert!(source.is_finished());
        assert!(matches!(source.poll_page().unwrap(), SourcePoll::Finished));
    }
}
