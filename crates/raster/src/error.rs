use alloc::collections::TryReserveError;
use thiserror::Error;

/// Errors reported by the rasterizer.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A coordinate of the path is beyond [`MAX_COORDINATE`](crate::MAX_COORDINATE).
    #[error("the path exceeds the supported coordinate range")]
    LimitExceeded,
}

impl From<TryReserveError> for RasterError {
    fn from(_: TryReserveError) -> Self {
        RasterError::OutOfMemory
    }
}

pub type RasterResult<T> = Result<T, RasterError>;
