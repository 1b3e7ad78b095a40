use super::{Codec, leading};
use crate::{DecodeError, LogicalType};

/// Big-endian u128 codec. Lexicographic order == numeric order.
pub struct BeU128;

impl Codec for BeU128 {
    const WIDTH: usize = 16;
    const LOGICAL_TYPE: LogicalType = LogicalType::Uuid;

    type Owned = u128;
    type Bytes = [u8; 16];

    #[inline]
    fn encode(v: u128) -> [u8; 16] {
        v.to_be_bytes()
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<u128, DecodeError> {
        leading::<16>(src).map(u128::from_be_bytes)
    }
}
