use kestrel_path::PathError;

/// The triangulator's result type.
pub type TriangulationResult<T> = Result<T, TriangulationError>;

/// Describes an unexpected error happening during triangulation.
///
/// These are never expected for valid input and are reported rather than retried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InternalError {
    /// The sweep left an active edge that does not bound a trapezoid.
    UnpairedActiveEdge,
    /// A face of the monotone decomposition could not be walked.
    InvalidFace,
    /// A face of the monotone decomposition is not monotone.
    NonMonotoneFace,
}

#[cfg(feature = "std")]
impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InternalError::UnpairedActiveEdge => {
                std::write!(f, "Odd number of active edges in the sweep")
            }
            InternalError::InvalidFace => {
                std::write!(f, "Invalid face in the monotone decomposition")
            }
            InternalError::NonMonotoneFace => {
                std::write!(f, "Non-monotone face in the monotone decomposition")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InternalError {}

/// The triangulator's error enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriangulationError {
    /// The path cannot be triangulated, for example because it intersects itself.
    InvalidInput(&'static str),
    OutOfMemory,
    Internal(InternalError),
}

#[cfg(feature = "std")]
impl core::fmt::Display for TriangulationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TriangulationError::InvalidInput(reason) => {
                std::write!(f, "Invalid input: {reason}")
            }
            TriangulationError::OutOfMemory => {
                std::write!(f, "Out of memory")
            }
            TriangulationError::Internal(e) => {
                std::write!(f, "Internal error: {e}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TriangulationError {}

impl core::convert::From<InternalError> for TriangulationError {
    fn from(value: InternalError) -> Self {
        Self::Internal(value)
    }
}

impl core::convert::From<PathError> for TriangulationError {
    fn from(value: PathError) -> Self {
        match value {
            PathError::OutOfMemory => Self::OutOfMemory,
            PathError::InvalidState => Self::InvalidInput("the path is not started"),
            PathError::InvalidArgument(reason) => Self::InvalidInput(reason),
            PathError::Limit => Self::InvalidInput("the path exceeds the supported limits"),
        }
    }
}

impl core::convert::From<alloc::collections::TryReserveError> for TriangulationError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
