use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all strata operations.
///
/// Errors fall into the three families the execution layer cares about:
///
/// - **Shape errors** ([`Error::ShapeMismatch`], [`Error::PositionOutOfRange`],
///   [`Error::ColumnOutOfRange`], [`Error::WidthMismatch`], [`Error::TypeMismatch`]):
///   contract violations between engine components. They are fatal to the
///   current operation and are never retried.
/// - **Cast errors** ([`Error::Cast`]): user-facing conversion failures that
///   carry the offending value or length.
/// - **Resource errors** ([`Error::Io`], [`Error::Source`]): failures of an
///   external producer. The engine decides whether to retry the whole
///   operation; the failing page source must still accept `close()`.
///
/// `Error` is `Send + Sync` so it can cross the worker threads that drive
/// page sources.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error raised by an external producer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error raised while converting blocks to or from arrow arrays.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid caller input or API parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// A page was assembled from blocks whose position counts disagree with
    /// the page row count.
    #[error("page expects {expected} rows but column {column} has {actual} positions")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        column: usize,
    },

    /// A block position outside `[0, count)` was accessed.
    #[error("position {position} is out of range for block with {count} positions")]
    PositionOutOfRange { position: usize, count: usize },

    /// A page column outside `[0, count)` was accessed.
    #[error("column {column} is out of range for page with {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },

    /// A fixed-width payload had the wrong number of bytes.
    #[error("{logical_type} values are {expected} bytes wide, got {actual}")]
    WidthMismatch {
        logical_type: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A typed accessor or operator was applied to a block of another type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A user-facing cast failure.
    #[error(transparent)]
    Cast(#[from] CastError),

    /// No operator set is registered for the logical type.
    #[error("no operators registered for type {0}")]
    OperatorNotFound(&'static str),

    /// No cast is registered for the ordered pair of types.
    #[error("no cast registered from {from} to {to}")]
    CastNotFound {
        from: &'static str,
        to: &'static str,
    },

    /// `next_page` was called on a page source that already reported finished.
    #[error("page source is finished")]
    SourceFinished,

    /// Terminal failure of an external page producer.
    #[error("page source failed: {0}")]
    Source(String),

    /// Violated internal invariant.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap any displayable producer failure as [`Error::Source`].
    #[inline]
    pub fn source_failure<E: fmt::Display>(err: E) -> Self {
        Error::Source(err.to_string())
    }

    #[inline]
    pub fn internal<E: fmt::Display>(err: E) -> Self {
        Error::Internal(err.to_string())
    }

    /// True for errors that describe bad user input rather than a wiring bug.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Cast(_) | Error::InvalidArgumentError(_))
    }
}

/// Failure of a cast between two logical types.
///
/// The display text is part of the user-facing contract: it names the target
/// type and either the offending length or the offending value verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    /// Textual input had a length the target's literal syntax does not allow.
    #[error("Invalid {target} string length: {length}")]
    InvalidTextLength { target: &'static str, length: usize },

    /// Binary input had a length other than the target's fixed width.
    #[error("Invalid {target} binary length: {length}")]
    InvalidBinaryLength { target: &'static str, length: usize },

    /// Input had an acceptable length but is not a valid literal.
    #[error("Cannot cast value to {target}: {value}")]
    Malformed { target: &'static str, value: String },

    /// Source bytes are not valid for the source type (e.g. non UTF-8 text).
    #[error("Cannot cast {from} to {target}: source bytes are not a valid {from}")]
    InvalidSource {
        from: &'static str,
        target: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_messages_name_the_defect() {
        let err = CastError::InvalidTextLength {
            target: "UUID",
            length: 9,
        };
        assert_eq!(err.to_string(), "Invalid UUID string length: 9");

        let err = CastError::InvalidBinaryLength {
            target: "UUID",
            length: 5,
        };
        assert_eq!(err.to_string(), "Invalid UUID binary length: 5");

        let err: Error = CastError::Malformed {
            target: "UUID",
            value: "not-a-uuid".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Cannot cast value to UUID: not-a-uuid");
        assert!(err.is_user_error());
    }

    #[test]
    fn shape_errors_are_not_user_errors() {
        let err = Error::PositionOutOfRange {
            position: 4,
            count: 2,
        };
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("position 4"));
    }
}
