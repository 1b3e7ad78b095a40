//! Operator sets for the built-in logical types.

mod double;
mod ord;
pub mod uuid;

pub use double::DoubleOperators;
pub use ord::{
    BigIntOperators, BigIntValues, BooleanOperators, BooleanValues, NaturalOrder, OrdOperators,
    VarbinaryOperators, VarbinaryValues, VarcharOperators, VarcharValues,
};
pub use uuid::UuidOperators;
