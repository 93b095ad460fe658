//! Errors raised while decoding a single record payload.

use std::error::Error;
use std::fmt;

/// A record payload did not match the shape expected at its position.
///
/// Produced by [`RecordDecoder`](crate::RecordDecoder) implementations.
/// The frame reader wraps it with the frame index and byte offset, so
/// this type only describes what went wrong inside the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload ended before a field could be read.
    Truncated {
        /// Name of the field being read.
        field: &'static str,
        /// Bytes needed to finish the field.
        needed: usize,
        /// Bytes left in the payload.
        available: usize,
    },
    /// Bytes remained after the last field was decoded.
    TrailingBytes {
        /// Number of unconsumed bytes.
        count: usize,
    },
    /// A field held a value outside its domain.
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the problem.
        detail: String,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                field,
                needed,
                available,
            } => write!(
                f,
                "truncated {field}: needed {needed} bytes, {available} available"
            ),
            Self::TrailingBytes { count } => {
                write!(f, "{count} trailing bytes after last field")
            }
            Self::InvalidValue { field, detail } => write!(f, "invalid {field}: {detail}"),
        }
    }
}

impl Error for DecodeError {}
