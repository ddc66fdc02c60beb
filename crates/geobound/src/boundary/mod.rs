//! Typed boundary shapes.
//!
//! Each variant owns one `NativeBoundaryHandle` acquired in its constructor;
//! constructors either return a live boundary or an error with nothing left
//! in the engine. Boundaries are immutable apart from disposal.
//!
//! Disposal has two spellings:
//! - `Boundary::dispose(self)` consumes the boundary; later use does not compile.
//! - `Boundary::release(&mut self)` for boundaries living in collections;
//!   queries afterwards return `BoundaryError::UseAfterDispose` and a second
//!   release is a no-op.
//!
//! Dropping an undisposed boundary releases its handle through `Drop`.

mod circle;
mod polygon;
mod rectangle;

pub use circle::CircleBoundary;
pub use polygon::PolygonBoundary;
pub use rectangle::RectangleBoundary;

use crate::coord::Coordinate;
use crate::error::BoundaryError;
use crate::handle::NativeBoundaryHandle;
use std::fmt;

/// Closed set of shapes the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Rectangle,
    Circle,
    Polygon,
}

impl BoundaryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Polygon => "polygon",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability shared by every boundary shape.
pub trait Boundary {
    fn kind(&self) -> BoundaryKind;

    /// Engine point-in-shape predicate for this boundary.
    fn contains_coordinate(&self, point: Coordinate) -> Result<bool, BoundaryError>;

    /// Release the engine handle. Idempotent: later calls return `Ok(())`.
    fn release(&mut self) -> Result<(), BoundaryError>;

    fn is_released(&self) -> bool;

    /// Release and consume.
    fn dispose(mut self) -> Result<(), BoundaryError>
    where
        Self: Sized,
    {
        self.release()
    }
}

impl<B: Boundary + ?Sized> Boundary for Box<B> {
    fn kind(&self) -> BoundaryKind {
        (**self).kind()
    }

    fn contains_coordinate(&self, point: Coordinate) -> Result<bool, BoundaryError> {
        (**self).contains_coordinate(point)
    }

    fn release(&mut self) -> Result<(), BoundaryError> {
        (**self).release()
    }

    fn is_released(&self) -> bool {
        (**self).is_released()
    }
}

/// Holds a boundary's handle until it is released.
#[derive(Debug)]
struct HandleSlot {
    kind: BoundaryKind,
    handle: Option<NativeBoundaryHandle>,
}

impl HandleSlot {
    fn new(handle: NativeBoundaryHandle) -> Self {
        Self {
            kind: handle.kind(),
            handle: Some(handle),
        }
    }

    fn get(&self) -> Result<&NativeBoundaryHandle, BoundaryError> {
        self.handle
            .as_ref()
            .ok_or(BoundaryError::UseAfterDispose { kind: self.kind })
    }

    // The handle leaves the slot before `destroy` runs, so a failed destroy
    // is never retried.
    fn release(&mut self) -> Result<(), BoundaryError> {
        match self.handle.take() {
            Some(handle) => handle.destroy(),
            None => Ok(()),
        }
    }

    fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    fn contains(&self, point: Coordinate) -> Result<bool, BoundaryError> {
        Ok(self.get()?.contains(point))
    }
}

#[cfg(test)]
mod tests;
