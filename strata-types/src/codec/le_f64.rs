use super::{Codec, leading};
use crate::{DecodeError, LogicalType};

/// Little-endian f64 codec. The bit pattern is stored as-is, so NaN payloads
/// and signed zeros survive a round trip.
pub struct LeF64;

impl Codec for LeF64 {
    const WIDTH: usize = 8;
    const LOGICAL_TYPE: LogicalType = LogicalType::Double;

    type Owned = f64;
    type Bytes = [u8; 8];

    #[inline]
    fn encode(v: f64) -> [u8; 8] {
        v.to_le_bytes()
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<f64, DecodeError> {
        leading::<8>(src).map(f64::from_le_bytes)
    }
}
