use super::{Boundary, BoundaryKind, HandleSlot};
use crate::coord::Coordinate;
use crate::engine::GeometryEngine;
use crate::error::BoundaryError;
use crate::handle::{NativeBoundaryHandle, NativeParams};
use std::sync::Arc;

/// Disc around `center`. Radius units and positivity are the engine's call
/// (the reference engine uses meters and rejects `radius <= 0`).
#[derive(Debug)]
pub struct CircleBoundary {
    slot: HandleSlot,
}

impl CircleBoundary {
    pub fn new(
        engine: Arc<dyn GeometryEngine>,
        center: Coordinate,
        radius: f64,
    ) -> Result<Self, BoundaryError> {
        let handle = NativeBoundaryHandle::create(
            engine,
            NativeParams::Circle {
                center: center.into(),
                radius,
            },
        )?;
        Ok(Self {
            slot: HandleSlot::new(handle),
        })
    }

    /// `(center, radius)` from a single engine call.
    pub fn params(&self) -> Result<(Coordinate, f64), BoundaryError> {
        Ok(self.slot.get()?.circle_params())
    }

    pub fn center(&self) -> Result<Coordinate, BoundaryError> {
        self.params().map(|(center, _)| center)
    }

    pub fn radius(&self) -> Result<f64, BoundaryError> {
        self.params().map(|(_, radius)| radius)
    }
}

impl Boundary for CircleBoundary {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Circle
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
