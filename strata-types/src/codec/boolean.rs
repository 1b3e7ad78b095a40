use super::{Codec, leading};
use crate::{DecodeError, LogicalType};

/// Boolean codec (0 for false, 1 for true).
pub struct BoolCodec;

impl Codec for BoolCodec {
    const WIDTH: usize = 1;
    const LOGICAL_TYPE: LogicalType = LogicalType::Boolean;

    type Owned = bool;
    type Bytes = [u8; 1];

    #[inline]
    fn encode(v: bool) -> [u8; 1] {
        [u8::from(v)]
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<bool, DecodeError> {
        match leading::<1>(src)? {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(DecodeError::InvalidFormat),
        }
    }
}
