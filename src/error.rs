//! When parsing a float literal goes wrong.

use core::fmt::{self, Display};
use core::result;

/// This type represents the ways a literal can fail to parse.
///
/// There are exactly two: the input was empty, or some byte of it did not
/// match the grammar. Out-of-range magnitudes are **not** errors; they
/// saturate to zero or infinity per IEEE-754.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
}

/// Categorizes the cause of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was zero bytes long.
    Empty,
    /// The input did not match the grammar: an unexpected byte, trailing
    /// characters after a parsable prefix, a misplaced digit separator, or
    /// an exponent with no digits.
    Invalid,
}

/// Alias for a `Result` with the error type `atof::Error`.
pub type Result<T> = result::Result<T, Error>;

impl Error {
    #[inline]
    pub(crate) fn empty() -> Self {
        Error {
            kind: ErrorKind::Empty,
        }
    }

    #[inline]
    pub(crate) fn invalid() -> Self {
        Error {
            kind: ErrorKind::Invalid,
        }
    }

    /// Categorizes the cause of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Empty => f.write_str("cannot parse float from empty input"),
            ErrorKind::Invalid => f.write_str("invalid float literal"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

// TESTS
// -----
