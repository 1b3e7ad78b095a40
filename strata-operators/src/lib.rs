//! Per-type operator sets, casts and their registry.
//!
//! A [`TypeOperators`] implementation supplies equality, the two compare
//! variants, hashing and the indeterminate predicate for one logical type.
//! Execution code resolves it through [`TypeOperatorRegistry`] when an
//! operator is planned and then calls it directly for every position.
//!
//! ```
//! use strata_block::BlockBuilder;
//! use strata_operators::{TypeOperatorRegistry, TypeOperators, parse_uuid};
//! use strata_types::LogicalType;
//!
//! let registry = TypeOperatorRegistry::global();
//! let ops = registry.operators(LogicalType::Uuid).unwrap();
//!
//! let mut builder = BlockBuilder::new(LogicalType::Uuid, 2);
//! builder.append_uuid(parse_uuid("12151fd2-7586-11e9-8f9e-2a86e4085a59").unwrap()).unwrap();
//! builder.append_uuid(parse_uuid("12151FD2-7586-11E9-8F9E-2A86E4085A59").unwrap()).unwrap();
//! let block = builder.finish();
//!
//! assert!(ops.equal(&block, 0, &block, 1).unwrap());
//! ```
#![forbid(unsafe_code)]

pub mod cast;
pub mod kernels;
mod operators;
mod registry;
pub mod types;

pub use cast::{CastFn, CastOperator, standard_casts};
pub use kernels::{distinct_from_block, hash_block, sort_positions};
pub use operators::{NULL_HASH, SortOrder, TypeOperators, compare_nulls};
pub use registry::TypeOperatorRegistry;
pub use types::uuid::{
    UUID_TEXT_LENGTH, format_uuid, parse_uuid, random_uuid, random_uuid_block, uuid_casts,
    uuid_from_binary, uuid_to_binary,
};
pub use types::{
    BigIntOperators, BooleanOperators, DoubleOperators, OrdOperators, UuidOperators,
    VarbinaryOperators, VarcharOperators,
};
