use super::{Boundary, BoundaryKind, HandleSlot};
use crate::coord::Coordinate;
use crate::engine::GeometryEngine;
use crate::error::BoundaryError;
use crate::handle::{NativeBoundaryHandle, NativeParams};
use crate::marshal::ForeignBuffer;
use std::sync::Arc;

/// Closed ring of vertices; the last vertex connects back to the first.
#[derive(Debug)]
pub struct PolygonBoundary {
    slot: HandleSlot,
}

impl PolygonBoundary {
    /// Empty input is rejected here, before any buffer or engine call.
    /// Other vertex-count rules belong to the engine.
    pub fn new(
        engine: Arc<dyn GeometryEngine>,
        coordinates: &[Coordinate],
    ) -> Result<Self, BoundaryError> {
        if coordinates.is_empty() {
            return Err(BoundaryError::invalid(
                "polygon needs at least one coordinate",
            ));
        }
        let buffer = ForeignBuffer::pack(coordinates)?;
        let created = NativeBoundaryHandle::create(engine, NativeParams::Polygon(&buffer));
        // The engine keeps its own copy; the packed region goes on both paths.
        drop(buffer);
        Ok(Self {
            slot: HandleSlot::new(created?),
        })
    }

    /// Vertices as stored by the engine, in engine enumeration order.
    pub fn coordinates(&self) -> Result<Vec<Coordinate>, BoundaryError> {
        self.slot
            .get()?
            .polygon_points()
            .map_err(|code| BoundaryError::QueryFailed {
                kind: BoundaryKind::Polygon,
                code,
            })
    }
}

impl Boundary for PolygonBoundary {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Polygon
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
