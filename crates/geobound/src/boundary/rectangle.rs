use super::{Boundary, BoundaryKind, HandleSlot};
use crate::coord::Coordinate;
use crate::engine::GeometryEngine;
use crate::error::BoundaryError;
use crate::handle::{NativeBoundaryHandle, NativeParams};
use std::sync::Arc;

/// Lat/lon box given by two opposite corners.
#[derive(Debug)]
pub struct RectangleBoundary {
    slot: HandleSlot,
}

impl RectangleBoundary {
    pub fn new(
        engine: Arc<dyn GeometryEngine>,
        top_left: Coordinate,
        bottom_right: Coordinate,
    ) -> Result<Self, BoundaryError> {
        let handle = NativeBoundaryHandle::create(
            engine,
            NativeParams::Rectangle {
                top_left: top_left.into(),
                bottom_right: bottom_right.into(),
            },
        )?;
        Ok(Self {
            slot: HandleSlot::new(handle),
        })
    }

    /// `(top_left, bottom_right)` from a single engine call.
    pub fn corners(&self) -> Result<(Coordinate, Coordinate), BoundaryError> {
        Ok(self.slot.get()?.rectangle_corners())
    }

    pub fn top_left(&self) -> Result<Coordinate, BoundaryError> {
        self.corners().map(|(top_left, _)| top_left)
    }

    pub fn bottom_right(&self) -> Result<Coordinate, BoundaryError> {
        self.corners().map(|(_, bottom_right)| bottom_right)
    }
}

impl Boundary for RectangleBoundary {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Rectangle
    }

    fn contains_coordinate(&self, point: Coordinate) -> Result<bool, BoundaryError> {
        self.slot.contains(point)
    }

    fn release(&mut self) -> Result<(), BoundaryError> {
        self.slot.release()
    }

    fn is_released(&self) -> bool {
        self.slot.is_released()
    }
}
