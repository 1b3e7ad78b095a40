//! Error types and result definitions for strata.
//!
//! Every crate in the workspace returns [`Result<T>`] with the shared [`Error`]
//! enum so failures propagate across crate boundaries with `?`. Cast failures
//! additionally have their own [`CastError`] so pure cast functions can stay
//! independent of the block layer.

pub mod error;
pub mod result;

pub use error::{CastError, Error};
pub use result::Result;
