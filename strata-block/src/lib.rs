//! Columnar memory model: [`Block`], [`BlockBuilder`] and [`Page`].
//!
//! A block is one column of one [`LogicalType`](strata_types::LogicalType)
//! over a batch of positions, plus a validity bitmap. Builders are the only
//! way to create block storage; sealing one is a move, so a sealed block can
//! never be mutated. Blocks and pages are `Send + Sync` and are shared across
//! worker threads without locking. Slices and projections are views over the
//! same reference-counted arrow buffers.

#![forbid(unsafe_code)]

mod arrow_interop;
mod block;
mod builder;
mod page;

pub use arrow_interop::{arrow_data_type, schema_for};
pub use block::Block;
pub use builder::BlockBuilder;
pub use page::Page;
