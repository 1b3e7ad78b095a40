use std::collections::VecDeque;
use std::time::{Duration, Instant};

use strata_block::Page;
use strata_result::Result;
use tracing::debug;

use crate::source::{PageSource, ensure_active};

/// Source draining a queue of pages that are already in memory.
///
/// Queued pages count toward [`memory_usage`](PageSource::memory_usage) until
/// they are handed out, at which point their size moves to
/// `completed_bytes`.
#[derive(Debug, Default)]
pub struct MemoryPageSource {
    pages: VecDeque<Page>,
    completed_bytes: u64,
    read_time: Duration,
    finished: bool,
}

impl MemoryPageSource {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Pages not yet handed out.
    pub fn remaining(&self) -> usize {
        self.pages.len()
    }
}

impl PageSource for MemoryPageSource {
    fn completed_bytes(&self) -> u64 {
        self.completed_bytes
    }

    fn read_time(&self) -> Duration {
        self.read_time
    }

    fn memory_usage(&self) -> u64 {
        self.pages.iter().map(|p| p.size_in_bytes() as u64).sum()
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        ensure_active(self.finished)?;
        let started = Instant::now();
        let page = self.pages.pop_front();
        match &page {
            Some(page) => self.completed_bytes += page.size_in_bytes() as u64,
            None => self.finished = true,
        }
        if self.pages.is_empty() {
            self.finished = true;
            debug!(bytes = self.completed_bytes, "memory source drained");
        }
        self.read_time += started.elapsed();
        Ok(page)
    }

    fn close(&mut self) -> Result<()> {
        self.pages.clear();
        self.finished = true;
        Ok(())
    }
}
