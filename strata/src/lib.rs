//! Strata: the columnar value layer of a SQL execution engine.
//!
//! This crate re-exports the `strata-*` crates under one roof.
//!
//! ```rust
//! use strata::{LogicalType, Page, TypeOperatorRegistry, TypeOperators};
//! use strata::source::{CountOnlyPageSource, PageSource};
//!
//! let mut source = CountOnlyPageSource::new(1000);
//! let page: Page = source.next_page().unwrap().unwrap();
//! assert_eq!((page.row_count(), page.column_count()), (1000, 0));
//!
//! let ops = TypeOperatorRegistry::global().operators(LogicalType::Uuid).unwrap();
//! assert_eq!(ops.logical_type(), LogicalType::Uuid);
//! ```
//!
//! # Architecture
//!
//! - **Values** (`strata-types`): logical types, fixed-width codecs, identity.
//! - **Memory model** (`strata-block`): immutable blocks, builders, pages and
//!   arrow conversions.
//! - **Operators** (`strata-operators`): per-type equality, ordering, hashing
//!   and casts behind a resolve-once registry.
//! - **Sources** (`strata-source`): the pull protocol external producers
//!   implement, plus a single-thread driver.

pub use strata_block::{Block, BlockBuilder, Page, arrow_data_type, schema_for};
pub use strata_operators::{
    CastOperator, SortOrder, TypeOperatorRegistry, TypeOperators, format_uuid, parse_uuid,
    random_uuid,
};
pub use strata_result::{CastError, Error, Result};
pub use strata_types::{Identity, LogicalType};

/// Operator sets, casts and block kernels.
pub mod operators {
    pub use strata_operators::*;
}

/// Page sources and the source driver.
pub mod source {
    pub use strata_source::*;
}

/// Value codecs.
pub mod codec {
    pub use strata_types::codec::*;
}
