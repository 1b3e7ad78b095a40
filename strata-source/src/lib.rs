//! Pull-based page sources.
//!
//! External producers implement [`PageSource`]; the engine polls it for
//! pages without blocking. [`CountOnlyPageSource`] is the fast path for
//! queries that need rows but no columns. [`SourceDriver`] multiplexes many
//! sources on a single thread.
#![forbid(unsafe_code)]

mod channel;
pub mod config;
mod count_only;
mod driver;
mod memory;
mod provider;
mod source;

pub use channel::{ChannelPageSource, PageSender};
pub use config::SourceDriverConfig;
pub use count_only::CountOnlyPageSource;
pub use driver::{DrivenPage, DriverStats, SourceDriver};
pub use memory::MemoryPageSource;
pub use provider::{MemoryTable, PageSourceProvider, SourceSplit};
pub use source::{PageSource, SourcePoll};
