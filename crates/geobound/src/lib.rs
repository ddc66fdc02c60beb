//! Geographic boundaries backed by a native geometry engine.
//!
//! Layers (leaf-first)
//! - `coord`: `Coordinate` values and their C-layout twin `RawPoint`.
//! - `engine`: the `GeometryEngine` capability consumed by the core, plus an
//!   in-process `ReferenceEngine`.
//! - `handle`: `NativeBoundaryHandle`, the single owner of one engine token.
//! - `marshal`: contiguous packing for polygon input and callback-driven
//!   enumeration for polygon output.
//! - `boundary`: `RectangleBoundary`, `CircleBoundary`, `PolygonBoundary`.
//!
//! Ownership rules
//! - Every boundary owns exactly one engine token, acquired in its constructor.
//! - Constructors are all-or-nothing: on error no boundary exists and no token
//!   is left behind.
//! - Tokens are released exactly once: `dispose(self)` consumes the boundary;
//!   `release(&mut self)` leaves a husk whose queries fail with
//!   `BoundaryError::UseAfterDispose`; `Drop` reclaims anything left over.
//! - Containment math lives in the engine, never here.

pub mod boundary;
pub mod coord;
pub mod engine;
pub mod error;
pub mod handle;
pub mod marshal;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use boundary::{Boundary, BoundaryKind, CircleBoundary, PolygonBoundary, RectangleBoundary};
pub use coord::{Coordinate, RawPoint};
pub use engine::{EngineCfg, GeometryEngine, RawHandle, ReferenceEngine, ResultCode};
pub use error::BoundaryError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::boundary::{
        Boundary, BoundaryKind, CircleBoundary, PolygonBoundary, RectangleBoundary,
    };
    pub use crate::coord::Coordinate;
    pub use crate::engine::{EngineCfg, GeometryEngine, ReferenceEngine};
    pub use crate::error::BoundaryError;
}
