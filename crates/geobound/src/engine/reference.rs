//! In-process reference engine.
//!
//! A small, self-contained `GeometryEngine` so the core can run without a
//! native library: tests, benches, the demo and the CLI all use it.
//!
//! Semantics
//! - Tokens are non-zero and never reused within one engine.
//! - Validation lives here: finite coordinates inside the lat/lon ranges,
//!   finite positive radius, at least three polygon vertices.
//! - Rectangle: inclusive lat/lon box spanned by the two corners, in either order.
//! - Circle: great-circle (haversine) distance in meters `<= radius`.
//! - Polygon: even-odd ray casting in the planar (lon, lat) chart; no
//!   antimeridian handling.

use super::{codes, GeometryEngine, PointCallback, RawHandle, ResultCode};
use crate::coord::{RawPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use crate::error::BoundaryError;
use nalgebra::Vector2;
use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Engine tolerances and constants.
#[derive(Clone, Copy, Debug)]
pub struct EngineCfg {
    /// Mean earth radius used by the circle predicate.
    pub earth_radius_m: f64,
    /// Slack on rectangle edges, in degrees.
    pub eps_deg: f64,
    /// Slack on circle radii, in meters.
    pub eps_m: f64,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            earth_radius_m: 6_371_008.8,
            eps_deg: 1e-12,
            eps_m: 1e-6,
        }
    }
}

impl EngineCfg {
    /// Earth radius must be finite and positive; slacks finite and non-negative.
    pub fn validate(&self) -> Result<(), BoundaryError> {
        if !(self.earth_radius_m.is_finite() && self.earth_radius_m > 0.0) {
            return Err(BoundaryError::invalid(format!(
                "earth_radius_m must be finite and positive, got {}",
                self.earth_radius_m
            )));
        }
        for (name, eps) in [("eps_deg", self.eps_deg), ("eps_m", self.eps_m)] {
            if !(eps.is_finite() && eps >= 0.0) {
                return Err(BoundaryError::invalid(format!(
                    "{name} must be finite and non-negative, got {eps}"
                )));
            }
        }
        Ok(())
    }
}

/// Lifetime counters, for leak and double-free checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub created: u64,
    pub destroyed: u64,
    /// Creation requests answered with a non-success code.
    pub rejected: u64,
    /// `destroy` calls naming a token that is not live.
    pub unknown_destroys: u64,
}

impl EngineStats {
    #[inline]
    pub fn live(&self) -> u64 {
        self.created - self.destroyed
    }
}

#[derive(Clone, Debug)]
enum Shape {
    Rectangle { top_left: RawPoint, bottom_right: RawPoint },
    Circle { center: RawPoint, radius: f64 },
    Polygon(Vec<RawPoint>),
}

#[derive(Default)]
struct Table {
    next: u64,
    shapes: HashMap<u64, Shape>,
    stats: EngineStats,
}

impl Table {
    fn insert(&mut self, shape: Shape) -> RawHandle {
        self.next += 1;
        self.shapes.insert(self.next, shape);
        self.stats.created += 1;
        RawHandle(self.next)
    }

    fn reject(&mut self, code: i32) -> (ResultCode, RawHandle) {
        self.stats.rejected += 1;
        (ResultCode(code), RawHandle::NULL)
    }
}

/// `GeometryEngine` backed by a mutex-guarded shape table.
#[derive(Default)]
pub struct ReferenceEngine {
    cfg: EngineCfg,
    table: Mutex<Table>,
}

impl ReferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom tolerances; rejects configs that `EngineCfg::validate` refuses.
    pub fn with_cfg(cfg: EngineCfg) -> Result<Self, BoundaryError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            table: Mutex::new(Table::default()),
        })
    }

    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    pub fn stats(&self) -> EngineStats {
        self.lock().stats
    }

    /// Great-circle distance in meters.
    pub fn haversine_m(&self, a: RawPoint, b: RawPoint) -> f64 {
        let (phi1, phi2) = (a.lat.to_radians(), b.lat.to_radians());
        let dphi = phi2 - phi1;
        let dlambda = (b.lon - a.lon).to_radians();
        let h = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        2.0 * self.cfg.earth_radius_m * h.min(1.0).sqrt().asin()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // Poisoning only means another caller panicked mid-query; the table
        // itself is never left half-written.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contains(&self, shape: &Shape, p: RawPoint) -> bool {
        match shape {
            Shape::Rectangle {
                top_left,
                bottom_right,
            } => {
                let eps = self.cfg.eps_deg;
                let (lat_lo, lat_hi) = min_max(top_left.lat, bottom_right.lat);
                let (lon_lo, lon_hi) = min_max(top_left.lon, bottom_right.lon);
                p.lat >= lat_lo - eps
                    && p.lat <= lat_hi + eps
                    && p.lon >= lon_lo - eps
                    && p.lon <= lon_hi + eps
            }
            Shape::Circle { center, radius } => {
                self.haversine_m(*center, p) <= radius + self.cfg.eps_m
            }
            Shape::Polygon(vertices) => ray_cast(vertices, p),
        }
    }
}

#[inline]
fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
fn valid_point(p: &RawPoint) -> bool {
    p.lat.is_finite()
        && p.lon.is_finite()
        && (MIN_LAT..=MAX_LAT).contains(&p.lat)
        && (MIN_LON..=MAX_LON).contains(&p.lon)
}

#[inline]
fn chart(p: RawPoint) -> Vector2<f64> {
    Vector2::new(p.lon, p.lat)
}

/// Even-odd rule; edges are implicit between consecutive vertices and last→first.
fn ray_cast(vertices: &[RawPoint], point: RawPoint) -> bool {
    let p = chart(point);
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = chart(vertices[i]);
        let b = chart(vertices[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let edge = b - a;
            let x_cross = a.x + edge.x * (p.y - a.y) / edge.y;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl GeometryEngine for ReferenceEngine {
    fn create_rectangle(
        &self,
        top_left: RawPoint,
        bottom_right: RawPoint,
    ) -> (ResultCode, RawHandle) {
        let mut table = self.lock();
        if !valid_point(&top_left) || !valid_point(&bottom_right) {
            return table.reject(codes::INVALID_COORDINATE);
        }
        let handle = table.insert(Shape::Rectangle {
            top_left,
            bottom_right,
        });
        (ResultCode::NONE, handle)
    }

    fn create_circle(&self, center: RawPoint, radius: f64) -> (ResultCode, RawHandle) {
        let mut table = self.lock();
        if !valid_point(&center) {
            return table.reject(codes::INVALID_COORDINATE);
        }
        if !(radius.is_finite() && radius > 0.0) {
            return table.reject(codes::INVALID_RADIUS);
        }
        let handle = table.insert(Shape::Circle { center, radius });
        (ResultCode::NONE, handle)
    }

    unsafe fn create_polygon(
        &self,
        points: *const RawPoint,
        count: usize,
    ) -> (ResultCode, RawHandle) {
        let mut table = self.lock();
        if points.is_null() {
            return table.reject(codes::NULL_BUFFER);
        }
        if count < 3 {
            return table.reject(codes::TOO_FEW_VERTICES);
        }
        // SAFETY: caller guarantees `points` is valid for `count` reads.
        let input = unsafe { std::slice::from_raw_parts(points, count) };
        if !input.iter().all(valid_point) {
            return table.reject(codes::INVALID_COORDINATE);
        }
        let handle = table.insert(Shape::Polygon(input.to_vec()));
        (ResultCode::NONE, handle)
    }

    fn destroy(&self, handle: RawHandle) -> ResultCode {
        let mut table = self.lock();
        if table.shapes.remove(&handle.0).is_some() {
            table.stats.destroyed += 1;
            ResultCode::NONE
        } else {
            table.stats.unknown_destroys += 1;
            ResultCode(codes::UNKNOWN_HANDLE)
        }
    }

    fn is_point_inside(&self, handle: RawHandle, point: RawPoint) -> bool {
        let table = self.lock();
        table
            .shapes
            .get(&handle.0)
            .map(|shape| self.contains(shape, point))
            .unwrap_or(false)
    }

    fn rectangle_corners(&self, handle: RawHandle) -> (RawPoint, RawPoint) {
        match self.lock().shapes.get(&handle.0) {
            Some(Shape::Rectangle {
                top_left,
                bottom_right,
            }) => (*top_left, *bottom_right),
            _ => {
                tracing::warn!(handle = handle.0, "rectangle_corners on non-rectangle token");
                (RawPoint::default(), RawPoint::default())
            }
        }
    }

    fn circle_params(&self, handle: RawHandle) -> (RawPoint, f64) {
        match self.lock().shapes.get(&handle.0) {
            Some(Shape::Circle { center, radius }) => (*center, *radius),
            _ => {
                tracing::warn!(handle = handle.0, "circle_params on non-circle token");
                (RawPoint::default(), 0.0)
            }
        }
    }

    unsafe fn enumerate_polygon_points(
        &self,
        handle: RawHandle,
        callback: PointCallback,
        context: *mut c_void,
    ) -> ResultCode {
        // Copy out so the callback never runs under the table lock.
        let vertices = match self.lock().shapes.get(&handle.0) {
            Some(Shape::Polygon(v)) => v.clone(),
            _ => return ResultCode(codes::UNKNOWN_HANDLE),
        };
        for p in vertices {
            // SAFETY: `context` belongs to `callback` per the trait contract.
            if !unsafe { callback(p, context) } {
                break;
            }
        }
        ResultCode::NONE
    }
}
