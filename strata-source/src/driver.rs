//! Cooperative scheduler multiplexing many page sources on one thread.

use std::thread;

use strata_block::Page;
use strata_result::{Error, Result};
use tracing::{debug, trace, warn};

use crate::config::SourceDriverConfig;
use crate::source::{PageSource, SourcePoll};

/// Totals accumulated by a [`SourceDriver`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DriverStats {
    pub pages: u64,
    pub rows: u64,
    /// `completed_bytes` of every source as it finished.
    pub bytes: u64,
    /// Polls that returned [`SourcePoll::Pending`].
    pub pending_polls: u64,
    /// Complete passes over the active sources.
    pub rounds: u64,
}

/// A page together with the index of the source that produced it.
#[derive(Debug, Clone)]
pub struct DrivenPage {
    pub source: usize,
    pub page: Page,
}

/// Round-robin driver over boxed sources.
///
/// Each round polls every active source once. Finished sources are closed
/// and dropped from the rotation. After a round where every active source was
/// pending the driver sleeps for the configured backoff. The first source
/// error closes every remaining source and is returned to the caller.
pub struct SourceDriver {
    sources: Vec<Option<Box<dyn PageSource>>>,
    config: SourceDriverConfig,
    stats: DriverStats,
}

impl SourceDriver {
    pub fn new(sources: Vec<Box<dyn PageSource>>) -> Self {
        Self::with_config(sources, SourceDriverConfig::default())
    }

    pub fn with_config(sources: Vec<Box<dyn PageSource>>, config: SourceDriverConfig) -> Self {
        Self {
            sources: sources.into_iter().map(Some).collect(),
            config,
            stats: DriverStats::default(),
        }
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Sources not yet finished.
    pub fn active(&self) -> usize {
        self.sources.iter().filter(|s| s.is_some()).count()
    }

    /// Drive every source to completion, calling `sink` for each page in
    /// completion order.
    pub fn run<F>(&mut self, mut sink: F) -> Result<DriverStats>
    where
        F: FnMut(DrivenPage) -> Result<()>,
    {
        let mut idle_rounds = 0usize;
        while self.active() > 0 {
            let mut progressed = false;
            for index in 0..self.sources.len() {
                match self.poll_source(index) {
                    Ok(Some(page)) => {
                        progressed = true;
                        if let Err(err) = sink(DrivenPage { source: index, page }) {
                            let _ = self.abort();
                            return Err(err);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(source = index, error = %err, "page source failed, aborting driver");
                        let _ = self.abort();
                        return Err(err);
                    }
                }
            }
            self.stats.rounds += 1;

            if progressed || self.active() == 0 {
                idle_rounds = 0;
                continue;
            }
            idle_rounds += 1;
            if let Some(limit) = self.config.max_idle_rounds
                && idle_rounds > limit
            {
                let _ = self.abort();
                return Err(Error::Source(format!(
                    "no source made progress in {limit} consecutive rounds"
                )));
            }
            trace!(idle_rounds, "all sources pending, backing off");
            if !self.config.idle_backoff.is_zero() {
                thread::sleep(self.config.idle_backoff);
            }
        }
        debug!(
            pages = self.stats.pages,
            rows = self.stats.rows,
            bytes = self.stats.bytes,
            "source driver finished"
        );
        Ok(self.stats)
    }

    /// Drive every source to completion and collect the pages.
    pub fn drain(&mut self) -> Result<Vec<DrivenPage>> {
        let mut pages = Vec::new();
        self.run(|page| {
            pages.push(page);
            Ok(())
        })?;
        Ok(pages)
    }

    /// Close every remaining source. Close failures are logged; the first
    /// one is returned after all sources have been closed.
    pub fn abort(&mut self) -> Result<()> {
        let mut first_error = None;
        for (index, slot) in self.sources.iter_mut().enumerate() {
            if let Some(mut source) = slot.take()
                && let Err(err) = source.close()
            {
                warn!(source = index, error = %err, "failed to close page source");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// One poll of source `index`. Returns the produced page, if any, and
    /// retires the source once it reports finished.
    fn poll_source(&mut self, index: usize) -> Result<Option<Page>> {
        let Some(source) = self.sources[index].as_mut() else {
            return Ok(None);
        };
        let page = match source.poll_page()? {
            SourcePoll::Ready(page) => {
                self.stats.pages += 1;
                self.stats.rows += page.row_count() as u64;
                Some(page)
            }
            SourcePoll::Pending => {
                self.stats.pending_polls += 1;
                None
            }
            SourcePoll::Finished => None,
        };
        if source.is_finished() {
            self.retire(index)?;
        }
        Ok(page)
    }

    fn retire(&mut self, index: usize) -> Result<()> {
        if let Some(mut source) = self.sources[index].take() {
            self.stats.bytes += source.completed_bytes();
            debug!(
                source = index,
                bytes = source.completed_bytes(),
                read_time_us = source.read_time().as_micros() as u64,
                "page source finished"
            );
            source.close()?;
        }
        Ok(())
    }
}

impl Drop for SourceDriver {
    fn drop(&mut self) {
        // Sources abandoned mid-run still release their resources.
        let _ = self.abort();
    }
}
