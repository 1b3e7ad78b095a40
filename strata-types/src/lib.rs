//! Logical type tags and value encodings shared by every strata crate.
//!
//! A [`LogicalType`] is a tiny `Copy` tag. It says how the payload bytes of a
//! block position are laid out; it does not carry behavior. Behavior
//! (equality, ordering, hashing, casts) lives in `strata-operators`, which
//! resolves one operator set per tag ahead of any hot loop.

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

pub mod codec;
pub mod errors;
pub mod identity;

pub use codec::{BeU128, BoolCodec, Codec, LeF64, LeI64};
pub use errors::DecodeError;
pub use identity::Identity;

/// Width in bytes of a UUID payload.
pub const UUID_WIDTH: usize = 16;

/// A tag naming the logical type of a block.
///
/// Fixed-width types store `position_count × width` payload bytes; the
/// variable-width types store an offsets array plus a values buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalType {
    /// One byte, `0` or `1`.
    Boolean,
    /// Little-endian `i64`.
    BigInt,
    /// Little-endian IEEE-754 `f64` bit pattern.
    Double,
    /// 128-bit value in big-endian (network) order.
    Uuid,
    /// UTF-8 text.
    Varchar,
    /// Opaque bytes.
    Varbinary,
}

impl LogicalType {
    pub const ALL: [LogicalType; 6] = [
        LogicalType::Boolean,
        LogicalType::BigInt,
        LogicalType::Double,
        LogicalType::Uuid,
        LogicalType::Varchar,
        LogicalType::Varbinary,
    ];

    /// Lowercase SQL name, used by `Display` and `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            LogicalType::Boolean => "boolean",
            LogicalType::BigInt => "bigint",
            LogicalType::Double => "double",
            LogicalType::Uuid => "uuid",
            LogicalType::Varchar => "varchar",
            LogicalType::Varbinary => "varbinary",
        }
    }

    /// Uppercase keyword used in user-facing cast messages.
    pub const fn keyword(self) -> &'static str {
        match self {
            LogicalType::Boolean => "BOOLEAN",
            LogicalType::BigInt => "BIGINT",
            LogicalType::Double => "DOUBLE",
            LogicalType::Uuid => "UUID",
            LogicalType::Varchar => "VARCHAR",
            LogicalType::Varbinary => "VARBINARY",
        }
    }

    /// Payload width for fixed-width types, `None` for variable-width ones.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            LogicalType::Boolean => Some(BoolCodec::WIDTH),
            LogicalType::BigInt => Some(LeI64::WIDTH),
            LogicalType::Double => Some(LeF64::WIDTH),
            LogicalType::Uuid => Some(BeU128::WIDTH),
            LogicalType::Varchar | LogicalType::Varbinary => None,
        }
    }

    #[inline]
    pub const fn is_fixed_width(self) -> bool {
        self.fixed_width().is_some()
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalType {
    type Err = strata_result::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LogicalType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                strata_result::Error::InvalidArgumentError(format!("unknown type '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for ty in LogicalType::ALL {
            assert_eq!(ty.name().parse::<LogicalType>().unwrap(), ty);
            assert_eq!(ty.keyword().parse::<LogicalType>().unwrap(), ty);
            assert_eq!(ty.to_string(), ty.name());
        }
        assert!("decimal".parse::<LogicalType>().is_err());
    }

    #[test]
    fn widths() {
        assert_eq!(LogicalType::Uuid.fixed_width(), Some(UUID_WIDTH));
        assert_eq!(LogicalType::BigInt.fixed_width(), Some(8));
        assert_eq!(LogicalType::Boolean.fixed_width(), Some(1));
        assert!(!LogicalType::Varchar.is_fixed_width());
        assert!(!LogicalType::Varbinary.is_fixed_width());
    }
}
