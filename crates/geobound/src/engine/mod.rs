//! Geometry engine capability.
//!
//! Purpose
//! - Describe the narrow, C-shaped surface the core consumes: create a shape
//!   and get a token back, query by token, destroy by token.
//! - Keep raw pointers and callbacks at this seam only; `handle` and `marshal`
//!   wrap them in owned types.
//!
//! Conventions
//! - Creation and destruction report a `ResultCode`; `ResultCode::NONE` (0) is
//!   success, anything else is engine specific.
//! - Getters for rectangle and circle parameters have no code: they are only
//!   called with tokens the core still owns.
//! - Implementors are shared across boundaries (`Arc<dyn GeometryEngine>`), so
//!   they must be `Send + Sync` and guard their own storage.

pub mod reference;

pub use reference::{EngineCfg, EngineStats, ReferenceEngine};

use crate::coord::RawPoint;
use std::ffi::c_void;

/// Result codes produced by `ReferenceEngine`.
pub mod codes {
    pub const NONE: i32 = 0;
    pub const INVALID_COORDINATE: i32 = 1;
    pub const INVALID_RADIUS: i32 = 2;
    pub const TOO_FEW_VERTICES: i32 = 3;
    pub const UNKNOWN_HANDLE: i32 = 4;
    pub const NULL_BUFFER: i32 = 5;
}

/// Integer status returned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResultCode(pub i32);

impl ResultCode {
    pub const NONE: ResultCode = ResultCode(codes::NONE);

    #[inline]
    pub fn is_success(self) -> bool {
        self == Self::NONE
    }

    /// `Ok(())` on success, otherwise the raw code.
    #[inline]
    pub fn check(self) -> Result<(), i32> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

/// Opaque engine token. Only meaningful to the engine that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawHandle(pub u64);

impl RawHandle {
    pub const NULL: RawHandle = RawHandle(0);
}

/// Per-point callback used by polygon enumeration. Return `true` to continue.
pub type PointCallback = unsafe extern "C" fn(point: RawPoint, context: *mut c_void) -> bool;

/// Capability set of the native geometry engine.
pub trait GeometryEngine: Send + Sync {
    fn create_rectangle(&self, top_left: RawPoint, bottom_right: RawPoint)
        -> (ResultCode, RawHandle);

    fn create_circle(&self, center: RawPoint, radius: f64) -> (ResultCode, RawHandle);

    /// # Safety
    /// `points` must be valid for reads of `count` consecutive `RawPoint`s for
    /// the duration of the call. The engine copies what it keeps.
    unsafe fn create_polygon(&self, points: *const RawPoint, count: usize)
        -> (ResultCode, RawHandle);

    fn destroy(&self, handle: RawHandle) -> ResultCode;

    fn is_point_inside(&self, handle: RawHandle, point: RawPoint) -> bool;

    /// `(top_left, bottom_right)` as stored at creation.
    fn rectangle_corners(&self, handle: RawHandle) -> (RawPoint, RawPoint);

    /// `(center, radius)` as stored at creation.
    fn circle_params(&self, handle: RawHandle) -> (RawPoint, f64);

    /// Invoke `callback(point, context)` for each stored vertex in order until
    /// it returns `false`.
    ///
    /// # Safety
    /// `context` must be the value `callback` expects; the engine passes it
    /// through untouched and must not retain either after returning.
    unsafe fn enumerate_polygon_points(
        &self,
        handle: RawHandle,
        callback: PointCallback,
        context: *mut c_void,
    ) -> ResultCode;
}
