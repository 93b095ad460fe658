//! Errors raised while assembling a training buffer.

use std::error::Error;
use std::fmt;

use crate::layout::BufferKey;

/// Errors from [`build`](crate::build).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// `sequence_length` was zero.
    InvalidSequenceLength,
    /// A step record does not have the shape the parameter record declares.
    StepShape {
        /// Index of the offending step record in the input stream.
        step: usize,
        /// The buffer field that could not be filled.
        key: BufferKey,
        /// Length implied by the parameter record.
        expected: usize,
        /// Length found in the step record.
        found: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSequenceLength => write!(f, "sequence_length must be at least 1"),
            Self::StepShape {
                step,
                key,
                expected,
                found,
            } => write!(
                f,
                "step {step}: {key} has length {found}, parameters declare {expected}"
            ),
        }
    }
}

impl Error for BufferError {}
