//! Marshaling error types.

use thiserror::Error;

/// Errors raised while moving data across the native boundary.
///
/// Every variant is raised before any partial mutation of caller state.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// A required argument was missing (the native equivalent of a null reference).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The source does not support the requested capability.
    #[error("operation not supported: {0}")]
    UnsupportedOperation(&'static str),
    /// An offset, count or length violated its range invariant.
    #[error("argument out of range: {0}")]
    OutOfRange(&'static str),
    /// The source kept returning zero bytes without reaching the requested length.
    #[error("stream stalled after {received} of {requested} bytes")]
    StalledRead {
        /// Number of bytes the caller asked for.
        requested: usize,
        /// Number of bytes delivered before the stall.
        received: usize,
    },
    /// The underlying source reported an I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarshalError {
    /// Name of the offending argument, for range and argument failures.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument(name) | Self::OutOfRange(name) => Some(name),
            _ => None,
        }
    }
}

/// Result alias for marshaling operations.
pub type MarshalResult<T> = Result<T, MarshalError>;
