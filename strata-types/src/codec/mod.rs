//! Fixed-width value codecs.
//!
//! Each codec is the one in-memory encoding of its logical type. Block
//! builders write `Codec::encode` output into the payload buffer and typed
//! readers call `Codec::decode` on a position's payload slice.
//!
//! - `BoolCodec`: one byte, `0` or `1`.
//! - `LeI64`, `LeF64`: little-endian, matching arrow's native buffers so
//!   blocks convert to arrow arrays without re-encoding.
//! - `BeU128`: big-endian, so byte-wise lexicographic order equals numeric
//!   order. UUIDs rely on this for unsigned byte-wise ordering.

mod be_u128;
mod boolean;
mod le_f64;
mod le_i64;

pub use be_u128::BeU128;
pub use boolean::BoolCodec;
pub use le_f64::LeF64;
pub use le_i64::LeI64;

use crate::{DecodeError, LogicalType};

/// A zero-overhead codec for one fixed-width logical type.
pub trait Codec {
    /// Encoded width in bytes.
    const WIDTH: usize;
    /// Logical type whose payloads this codec reads and writes.
    const LOGICAL_TYPE: LogicalType;

    type Owned: Copy;
    type Bytes: AsRef<[u8]>;

    fn encode(v: Self::Owned) -> Self::Bytes;

    /// Decodes the first `WIDTH` bytes of `src`.
    fn decode(src: &[u8]) -> Result<Self::Owned, DecodeError>;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, v: Self::Owned) {
        dst.extend_from_slice(Self::encode(v).as_ref());
    }
}

#[inline]
pub(crate) fn leading<const N: usize>(src: &[u8]) -> Result<[u8; N], DecodeError> {
    src.get(..N)
        .and_then(|s| <[u8; N]>::try_from(s).ok())
        .ok_or(DecodeError::NotEnoughData)
}
