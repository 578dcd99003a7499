//! Error types.

use alloc::vec::Vec;
use core::fmt;

/// Errors surfaced by field operations.
///
/// Everything else in the crate is total; invariant violations detected
/// internally are programming errors and panic instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Attempted to invert zero or divide by zero.
    DivisionByZero,

    /// A batch inversion encountered zero inputs.
    ///
    /// Carries the position of every zero input, in ascending order. The
    /// batch leaves all of its inputs bitwise unchanged when this is
    /// returned.
    BatchInversionOfZero {
        /// Indices of the zero-valued inputs.
        zero_indices: Vec<usize>,
    },

    /// The canonical representative does not fit the requested integer
    /// width.
    NotRepresentable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::BatchInversionOfZero { zero_indices } => write!(
                f,
                "batch inversion with {} zero input(s)",
                zero_indices.len()
            ),
            Error::NotRepresentable => {
                write!(f, "field element does not fit the requested integer width")
            }
        }
    }
}

impl core::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
