use std::time::Duration;

use strata_block::Page;
use strata_result::{Error, Result};

/// Outcome of one poll of a [`PageSource`].
#[derive(Debug, Clone)]
pub enum SourcePoll {
    /// A page was produced. More may or may not follow.
    Ready(Page),
    /// Nothing is ready yet and the source is not finished; poll again.
    Pending,
    /// The source has nothing more to produce.
    Finished,
}

/// Pull-based producer of pages.
///
/// A source is either active or finished, and once [`is_finished`] reports
/// `true` it stays `true`. [`next_page`] returning `Ok(None)` means "not ready
/// yet": implementations that wait on external resources report that instead
/// of blocking the caller, so one thread can drive many sources.
///
/// [`close`] releases external resources. It may be called in any state, any
/// number of times, including after a failure; afterwards the source reports
/// finished.
///
/// [`is_finished`]: PageSource::is_finished
/// [`next_page`]: PageSource::next_page
/// [`close`]: PageSource::close
pub trait PageSource: Send {
    /// Payload bytes produced so far.
    fn completed_bytes(&self) -> u64;

    /// Wall-clock time spent producing pages so far.
    fn read_time(&self) -> Duration;

    /// Bytes currently retained by the source itself.
    fn memory_usage(&self) -> u64;

    fn is_finished(&self) -> bool;

    /// Next page, or `None` when nothing is ready yet. Fails with
    /// [`Error::SourceFinished`] once the source is finished.
    fn next_page(&mut self) -> Result<Option<Page>>;

    fn close(&mut self) -> Result<()>;

    /// [`next_page`](PageSource::next_page) as a [`SourcePoll`].
    fn poll_page(&mut self) -> Result<SourcePoll> {
        if self.is_finished() {
            return Ok(SourcePoll::Finished);
        }
        match self.next_page()? {
            Some(page) => Ok(SourcePoll::Ready(page)),
            None if self.is_finished() => Ok(SourcePoll::Finished),
            None => Ok(SourcePoll::Pending),
        }
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn completed_bytes(&self) -> u64 {
        (**self).completed_bytes()
    }

    fn read_time(&self) -> Duration {
        (**self).read_time()
    }

    fn memory_usage(&self) -> u64 {
        (**self).memory_usage()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        (**self).next_page()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn poll_page(&mut self) -> Result<SourcePoll> {
        (**self).poll_page()
    }
}

/// Shared guard for `next_page` implementations.
#[inline]
pub(crate) fn ensure_active(finished: bool) -> Result<()> {
    if finished {
        Err(Error::SourceFinished)
    } else {
        Ok(())
    }
}
