//! Error taxonomy for boundary construction, queries and disposal.

use crate::boundary::BoundaryKind;
use std::fmt;

/// Everything that can go wrong between a caller and the geometry engine.
///
/// Variants that originate in the engine carry its raw result code.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryError {
    /// The engine rejected the shape parameters; no boundary was created.
    ConstructionFailed { kind: BoundaryKind, code: i32 },
    /// The polygon packing buffer could not be reserved; no engine call was made.
    AllocationFailed { requested: usize },
    /// The engine failed to release a handle during explicit disposal.
    ResourceDestroyFailed { kind: BoundaryKind, code: i32 },
    /// Query on a boundary whose handle was already released.
    UseAfterDispose { kind: BoundaryKind },
    /// Input rejected by this layer before reaching the engine.
    InvalidInput { reason: String },
    /// A code-reporting query (polygon enumeration) failed in the engine.
    QueryFailed { kind: BoundaryKind, code: i32 },
}

impl BoundaryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Original engine code, when the error came from the engine.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::ConstructionFailed { code, .. }
            | Self::ResourceDestroyFailed { code, .. }
            | Self::QueryFailed { code, .. } => Some(*code),
            Self::AllocationFailed { .. }
            | Self::UseAfterDispose { .. }
            | Self::InvalidInput { .. } => None,
        }
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstructionFailed { kind, code } => {
                write!(f, "engine rejected {kind} boundary (code {code})")
            }
            Self::AllocationFailed { requested } => write!(
                f,
                "could not allocate a point buffer for {requested} coordinates"
            ),
            Self::ResourceDestroyFailed { kind, code } => {
                write!(f, "engine failed to destroy {kind} boundary (code {code})")
            }
            Self::UseAfterDispose { kind } => {
                write!(f, "{kind} boundary used after it was disposed")
            }
            Self::InvalidInput { reason } => write!(f, "invalid boundary input: {reason}"),
            Self::QueryFailed { kind, code } => {
                write!(f, "engine query on {kind} boundary failed (code {code})")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}
