use super::{Codec, leading};
use crate::{DecodeError, LogicalType};

/// Little-endian i64 codec.
pub struct LeI64;

impl Codec for LeI64 {
    const WIDTH: usize = 8;
    const LOGICAL_TYPE: LogicalType = LogicalType::BigInt;

    type Owned = i64;
    type Bytes = [u8; 8];

    #[inline]
    fn encode(v: i64) -> [u8; 8] {
        v.to_le_bytes()
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<i64, DecodeError> {
        leading::<8>(src).map(i64::from_le_bytes)
    }
}
