/// Error type for fixed-width decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input slice does not contain enough bytes to decode a value.
    NotEnoughData,
    /// The byte pattern is not a valid encoding (e.g. a boolean byte of 7).
    InvalidFormat,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::NotEnoughData => f.write_str("not enough data to decode value"),
            DecodeError::InvalidFormat => f.write_str("invalid encoded value"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for strata_result::Error {
    fn from(err: DecodeError) -> Self {
        strata_result::Error::Internal(err.to_string())
    }
}
