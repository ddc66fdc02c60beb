//! Owned engine token.
//!
//! `NativeBoundaryHandle` is the only type that holds a `RawHandle` issued by
//! the engine. It is created from collaborator-ready parameters, answers
//! read-only queries, and is released exactly once:
//! - `destroy(self)` consumes it, so a second destroy does not compile;
//! - otherwise `Drop` releases it and logs a failure code instead of returning it.
//!
//! No retries happen here; a failed create leaves nothing behind.

use crate::boundary::BoundaryKind;
use crate::coord::{Coordinate, RawPoint};
use crate::engine::{GeometryEngine, RawHandle};
use crate::error::BoundaryError;
use crate::marshal::{self, ForeignBuffer};
use std::fmt;
use std::sync::Arc;

/// Shape parameters in the form the engine consumes.
#[derive(Clone, Copy, Debug)]
pub enum NativeParams<'a> {
    Rectangle {
        top_left: RawPoint,
        bottom_right: RawPoint,
    },
    Circle {
        center: RawPoint,
        radius: f64,
    },
    Polygon(&'a ForeignBuffer),
}

impl NativeParams<'_> {
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Self::Rectangle { .. } => BoundaryKind::Rectangle,
            Self::Circle { .. } => BoundaryKind::Circle,
            Self::Polygon(_) => BoundaryKind::Polygon,
        }
    }
}

/// Exclusive owner of one engine token. Not `Clone`.
pub struct NativeBoundaryHandle {
    engine: Arc<dyn GeometryEngine>,
    kind: BoundaryKind,
    raw: RawHandle,
    // Set once the token has been handed back; only `destroy` and `Drop` touch it.
    released: bool,
}

impl NativeBoundaryHandle {
    /// Ask the engine for a new shape. On a non-success code no handle exists.
    pub fn create(
        engine: Arc<dyn GeometryEngine>,
        params: NativeParams<'_>,
    ) -> Result<Self, BoundaryError> {
        let kind = params.kind();
        let (code, raw) = match params {
            NativeParams::Rectangle {
                top_left,
                bottom_right,
            } => engine.create_rectangle(top_left, bottom_right),
            NativeParams::Circle { center, radius } => engine.create_circle(center, radius),
            // SAFETY: `buffer` is borrowed for the whole call and holds `len()` points.
            NativeParams::Polygon(buffer) => unsafe {
                engine.create_polygon(buffer.as_ptr(), buffer.len())
            },
        };
        if let Err(code) = code.check() {
            tracing::debug!(%kind, code, "engine rejected boundary");
            return Err(BoundaryError::ConstructionFailed { kind, code });
        }
        tracing::debug!(%kind, handle = raw.0, "boundary handle created");
        Ok(Self {
            engine,
            kind,
            raw,
            released: false,
        })
    }

    #[inline]
    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    /// Run a read-only engine operation against this token.
    #[inline]
    pub fn query<T>(&self, op: impl FnOnce(&dyn GeometryEngine, RawHandle) -> T) -> T {
        op(self.engine.as_ref(), self.raw)
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        self.query(|engine, raw| engine.is_point_inside(raw, point.into()))
    }

    /// Both rectangle corners from one engine call.
    pub fn rectangle_corners(&self) -> (Coordinate, Coordinate) {
        let (top_left, bottom_right) = self.query(|engine, raw| engine.rectangle_corners(raw));
        (top_left.into(), bottom_right.into())
    }

    /// Circle center and radius from one engine call.
    pub fn circle_params(&self) -> (Coordinate, f64) {
        let (center, radius) = self.query(|engine, raw| engine.circle_params(raw));
        (center.into(), radius)
    }

    /// Polygon vertices in engine order; `Err` carries the engine code.
    pub fn polygon_points(&self) -> Result<Vec<Coordinate>, i32> {
        self.query(|engine, raw| {
            marshal::unpack(|callback, context| {
                // SAFETY: `unpack` pairs `callback` with its own `context`.
                unsafe { engine.enumerate_polygon_points(raw, callback, context) }
            })
        })
    }

    /// Release the token. Consumes the handle, so it cannot run twice.
    pub fn destroy(mut self) -> Result<(), BoundaryError> {
        self.released = true;
        let kind = self.kind;
        match self.engine.destroy(self.raw).check() {
            Ok(()) => {
                tracing::debug!(%kind, handle = self.raw.0, "boundary handle destroyed");
                Ok(())
            }
            Err(code) => Err(BoundaryError::ResourceDestroyFailed { kind, code }),
        }
    }
}

impl Drop for NativeBoundaryHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        tracing::warn!(
            kind = %self.kind,
            handle = self.raw.0,
            "reclaiming undisposed boundary handle"
        );
        if let Err(code) = self.engine.destroy(self.raw).check() {
            tracing::warn!(
                kind = %self.kind,
                handle = self.raw.0,
                code,
                "engine failed to destroy boundary during drop; ignoring"
            );
        }
    }
}

impl fmt::Debug for NativeBoundaryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBoundaryHandle")
            .field("kind", &self.kind)
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}
