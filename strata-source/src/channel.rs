use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel as xchan;
use strata_block::Page;
use strata_result::{Error, Result};
use tracing::{debug, warn};

use crate::source::PageSource;

/// Sending half handed to a page producer.
///
/// `send` fails once the consuming source has been closed; producers treat
/// that as the signal to stop.
pub type PageSender = xchan::Sender<Result<Page>>;

/// Source fed by a producer running on another thread.
///
/// Polling never blocks: an empty channel reads as "not ready yet". The
/// source finishes when every sender is dropped. A producer reports failure
/// by sending an `Err`, which surfaces once as [`Error::Source`] and ends the
/// source.
#[derive(Debug)]
pub struct ChannelPageSource {
    receiver: Option<xchan::Receiver<Result<Page>>>,
    completed_bytes: u64,
    read_time: Duration,
}

impl ChannelPageSource {
    pub fn new(receiver: xchan::Receiver<Result<Page>>) -> Self {
        Self {
            receiver: Some(receiver),
            completed_bytes: 0,
            read_time: Duration::ZERO,
        }
    }

    /// Bounded channel of `capacity` pages with its consuming source.
    pub fn bounded(capacity: usize) -> (PageSender, Self) {
        let (tx, rx) = xchan::bounded(capacity);
        (tx, Self::new(rx))
    }

    /// Run `producer` on a named worker thread feeding a new source. An
    /// error returned by the producer is forwarded to the source.
    pub fn spawn<F>(name: impl Into<String>, capacity: usize, producer: F) -> Result<Self>
    where
        F: FnOnce(&PageSender) -> Result<()> + Send + 'static,
    {
        let (tx, source) = Self::bounded(capacity);
        thread::Builder::new().name(name.into()).spawn(move || {
            if let Err(err) = producer(&tx) {
                // The source may already be closed; nothing is listening then.
                let _ = tx.send(Err(err));
            }
        })?;
        Ok(source)
    }

    fn release(&mut self) {
        if self.receiver.take().is_some() {
            debug!(bytes = self.completed_bytes, "channel source released");
        }
    }
}

impl PageSource for ChannelPageSource {
    fn completed_bytes(&self) -> u64 {
        self.completed_bytes
    }

    fn read_time(&self) -> Duration {
        self.read_time
    }

    /// Pages waiting in the channel are owned by the channel.
    fn memory_usage(&self) -> u64 {
        0
    }

    fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        let Some(receiver) = &self.receiver else {
            return Err(Error::SourceFinished);
        };
        let started = Instant::now();
        let received = receiver.try_recv();
        self.read_time += started.elapsed();

        match received {
            Ok(Ok(page)) => {
                self.completed_bytes += page.size_in_bytes() as u64;
                Ok(Some(page))
            }
            Ok(Err(err)) => {
                warn!(error = %err, "page producer failed");
                self.release();
                Err(match err {
                    Error::Source(_) => err,
                    other => Error::source_failure(other),
                })
            }
            Err(xchan::TryRecvError::Empty) => Ok(None),
            Err(xchan::TryRecvError::Disconnected) => {
                self.release();
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.release();
        Ok(())
    }
}

impl Drop for ChannelPageSource {
    fn drop(&mut self) {
        self.release();
    }
}
