//! UUID operators and casts.
//!
//! A UUID is stored as 16 bytes in big-endian order, which is also its binary
//! wire form. Equality, ordering and hashing all work on those bytes: two
//! UUIDs are equal iff every byte matches and order is unsigned
//! lexicographic, which the big-endian layout makes identical to `u128`
//! order.
//!
//! The textual form is exactly `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`: 36
//! characters, hex digits case-insensitive on input, lowercase on output.

use std::cmp::Ordering;
use std::hash::Hasher;

use rand::RngCore;
use rustc_hash::FxHasher;
use strata_block::{Block, BlockBuilder};
use strata_result::{CastError, Result};
use strata_types::{BeU128, Codec, LogicalType, UUID_WIDTH};
use uuid::Uuid;

use crate::cast::CastOperator;
use crate::operators::{TypeOperators, payload};

/// Length of the hyphenated text form.
pub const UUID_TEXT_LENGTH: usize = uuid::fmt::Hyphenated::LENGTH;

const TARGET: &str = "UUID";

/// Parse the 36-character hyphenated form into the in-memory value.
pub fn parse_uuid(text: &str) -> std::result::Result<u128, CastError> {
    let length = text.chars().count();
    if length != UUID_TEXT_LENGTH {
        return Err(CastError::InvalidTextLength {
            target: TARGET,
            length,
        });
    }
    // With exactly 36 characters the only layout `uuid` accepts is the
    // hyphenated one, so braced, URN and simple forms are rejected here.
    Uuid::try_parse(text)
        .map(|uuid| uuid.as_u128())
        .map_err(|_| CastError::Malformed {
            target: TARGET,
            value: text.to_string(),
        })
}

/// Canonical lowercase hyphenated text of `value`.
pub fn format_uuid(value: u128) -> String {
    Uuid::from_u128(value).hyphenated().to_string()
}

/// Interpret exactly 16 bytes as a UUID.
pub fn uuid_from_binary(bytes: &[u8]) -> std::result::Result<u128, CastError> {
    let bytes: [u8; UUID_WIDTH] =
        bytes
            .try_into()
            .map_err(|_| CastError::InvalidBinaryLength {
                target: TARGET,
                length: bytes.len(),
            })?;
    Ok(u128::from_be_bytes(bytes))
}

#[inline]
pub fn uuid_to_binary(value: u128) -> [u8; UUID_WIDTH] {
    BeU128::encode(value)
}

/// A fresh random (version 4) UUID.
///
/// Draws from the calling thread's generator, so concurrent callers never
/// contend on a shared lock. Not suitable where unpredictability matters.
pub fn random_uuid() -> u128 {
    let mut bytes = [0u8; UUID_WIDTH];
    rand::rng().fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid().as_u128()
}

/// Block of `count` random UUIDs, as produced by the `uuid()` function.
pub fn random_uuid_block(count: usize) -> Result<Block> {
    let mut builder = BlockBuilder::new(LogicalType::Uuid, count);
    for _ in 0..count {
        builder.append_uuid(random_uuid())?;
    }
    Ok(builder.finish())
}

fn varchar_to_uuid(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    let text = std::str::from_utf8(raw).map_err(|_| CastError::InvalidSource {
        from: LogicalType::Varchar.keyword(),
        target: TARGET,
    })?;
    parse_uuid(text).map(|value| uuid_to_binary(value).to_vec())
}

fn uuid_to_varchar(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    let value = uuid_from_binary(raw)?;
    let mut text = vec![0u8; UUID_TEXT_LENGTH];
    Uuid::from_u128(value).hyphenated().encode_lower(&mut text);
    Ok(text)
}

fn varbinary_to_uuid(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    uuid_from_binary(raw).map(|value| uuid_to_binary(value).to_vec())
}

fn uuid_to_varbinary(raw: &[u8]) -> std::result::Result<Vec<u8>, CastError> {
    uuid_from_binary(raw).map(|value| uuid_to_binary(value).to_vec())
}

/// The UUID cast family: text and binary, both directions.
pub fn uuid_casts() -> [CastOperator; 4] {
    [
        CastOperator::new(LogicalType::Varchar, LogicalType::Uuid, varchar_to_uuid),
        CastOperator::new(LogicalType::Uuid, LogicalType::Varchar, uuid_to_varchar),
        CastOperator::new(LogicalType::Varbinary, LogicalType::Uuid, varbinary_to_uuid),
        CastOperator::new(LogicalType::Uuid, LogicalType::Varbinary, uuid_to_varbinary),
    ]
}

/// Byte-wise operators for `uuid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidOperators;

impl UuidOperators {
    #[inline]
    fn bytes(block: &Block, position: usize) -> Result<&[u8]> {
        payload(block, position, LogicalType::Uuid)
    }

    #[inline]
    fn compare(left: &Block, lp: usize, right: &Block, rp: usize) -> Result<Ordering> {
        Ok(Self::bytes(left, lp)?.cmp(Self::bytes(right, rp)?))
    }
}

impl TypeOperators for UuidOperators {
    fn logical_type(&self) -> LogicalType {
        LogicalType::Uuid
    }

    fn equal(&self, left: &Block, lp: usize, right: &Block, rp: usize) -> Result<bool> {
        Ok(Self::bytes(left, lp)? == Self::bytes(right, rp)?)
    }

    fn compare_ordered_last(
        &self,
        left: &Block,
        lp: usize,
        right: &Block,
        rp: usize,
    ) -> Result<Ordering> {
        Self::compare(left, lp, right, rp)
    }

    fn compare_ordered_first(
        &self,
        left: &Block,
        lp: usize,
        right: &Block,
        rp: usize,
    ) -> Result<Ordering> {
        Self::compare(left, lp, right, rp)
    }

    /// Mixes the high and low big-endian halves.
    fn hash(&self, block: &Block, position: usize) -> Result<u64> {
        let value = BeU128::decode(Self::bytes(block, position)?)?;
        let mut hasher = FxHasher::default();
        hasher.write_u64((value >> 64) as u64);
        hasher.write_u64(value as u64);
        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_checks_length_before_layout() {
        assert_eq!(
            parse_uuid("1-2-3-4-1"),
            Err(CastError::InvalidTextLength {
                target: "UUID",
                length: 9
            })
        );
        let err = parse_uuid("12151fd217586211e938f9e42a86e4085a59").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot cast value to UUID: 12151fd217586211e938f9e42a86e4085a59"
        );
        // A simple (unhyphenated) UUID is 32 characters and fails on length.
        assert!(matches!(
            parse_uuid("12151fd2758611e98f9e2a86e4085a59"),
            Err(CastError::InvalidTextLength { length: 32, .. })
        ));
    }

    #[test]
    fn non_hex_digits_are_malformed() {
        assert!(matches!(
            parse_uuid("g2151fd2-7586-11e9-8f9e-2a86e4085a59"),
            Err(CastError::Malformed { .. })
        ));
    }

    #[test]
    fn length_counts_characters() {
        let text = "\u{e9}2151fd2-7586-11e9-8f9e-2a86e4085a59";
        assert_eq!(text.len(), 37);
        assert_eq!(text.chars().count(), 36);
        assert!(matches!(parse_uuid(text), Err(CastError::Malformed { .. })));
    }

    #[test]
    fn format_is_lowercase_hyphenated() {
        let value = parse_uuid("12151FD2-7586-11E9-8F9E-2A86E4085A59").unwrap();
        assert_eq!(format_uuid(value), "12151fd2-7586-11e9-8f9e-2a86e4085a59");
        assert_eq!(
            uuid_to_varchar(&uuid_to_binary(value)).unwrap(),
            b"12151fd2-7586-11e9-8f9e-2a86e4085a59"
        );
    }

    #[test]
    fn binary_length_is_exact() {
        assert_eq!(
            uuid_from_binary(&[0xf0, 0x00, 0x00, 0x11, 0x00]),
            Err(CastError::InvalidBinaryLength {
                target: "UUID",
                length: 5
            })
        );
        assert_eq!(uuid_from_binary(&[0u8; 16]), Ok(0));
    }

    #[test]
    fn random_uuids_are_version_4() {
        let a = Uuid::from_u128(random_uuid());
        let b = Uuid::from_u128(random_uuid());
        assert_eq!(a.get_version_num(), 4);
        assert_eq!(a.get_variant(), uuid::Variant::RFC4122);
        assert_ne!(a, b);
    }
}
