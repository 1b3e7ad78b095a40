use crate::error::Error;

/// Result type alias used throughout strata.
pub type Result<T> = std::result::Result<T, Error>;
