use alloc::collections::TryReserveError;
use thiserror::Error;

/// Errors reported by the path operations.
///
/// An operation that fails leaves the path in the state it had before the call.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("the path must be started with move_to first")]
    InvalidState,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("the path exceeds the supported size")]
    Limit,
}

impl From<TryReserveError> for PathError {
    fn from(_: TryReserveError) -> Self {
        PathError::OutOfMemory
    }
}

pub type PathResult<T> = Result<T, PathError>;
