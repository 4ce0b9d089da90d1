use core::fmt;

/// Errors surfaced across the public, parameter-set-independent surface (C7/C8).
///
/// Mirrors the four-way error taxonomy: a null/missing input, an
/// argument that fails a length or range check, a failed allocation of a
/// runtime-sized scratch buffer, and a failure reported by the supplied
/// randomness oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A required input buffer or seed was not supplied.
    NullInput,
    /// An input failed a length, range, or state-machine precondition check.
    InvalidArgument,
    /// A runtime-sized scratch allocation could not be satisfied.
    AllocFail,
    /// The supplied randomness oracle reported a failure.
    OracleError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NullInput => "a required input was null",
            Error::InvalidArgument => "an argument failed validation",
            Error::AllocFail => "scratch buffer allocation failed",
            Error::OracleError => "the randomness oracle failed",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
