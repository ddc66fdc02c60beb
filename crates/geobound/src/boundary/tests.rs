use super::*;
use crate::coord::RawPoint;
use crate::engine::{
    codes, EngineStats, GeometryEngine, PointCallback, RawHandle, ReferenceEngine, ResultCode,
};
use proptest::prelude::*;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn c(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon)
}

fn engine() -> Arc<ReferenceEngine> {
    Arc::new(ReferenceEngine::new())
}

/// Reference engine whose `destroy` fails with `code` after really destroying,
/// and which counts polygon creation calls.
struct FlakyEngine {
    inner: ReferenceEngine,
    destroy_code: i32,
    polygon_calls: AtomicUsize,
}

impl FlakyEngine {
    fn new(destroy_code: i32) -> Self {
        Self {
            inner: ReferenceEngine::new(),
            destroy_code,
            polygon_calls: AtomicUsize::new(0),
        }
    }
}

impl GeometryEngine for FlakyEngine {
    fn create_rectangle(&self, tl: RawPoint, br: RawPoint) -> (ResultCode, RawHandle) {
        self.inner.create_rectangle(tl, br)
    }
    fn create_circle(&self, center: RawPoint, radius: f64) -> (ResultCode, RawHandle) {
        self.inner.create_circle(center, radius)
    }
    unsafe fn create_polygon(
        &self,
        points: *const RawPoint,
        count: usize,
    ) -> (ResultCode, RawHandle) {
        self.polygon_calls.fetch_add(1, Ordering::SeqCst);
        unsafe { self.inner.create_polygon(points, count) }
    }
    fn destroy(&self, handle: RawHandle) -> ResultCode {
        let _ = self.inner.destroy(handle);
        ResultCode(self.destroy_code)
    }
    fn is_point_inside(&self, handle: RawHandle, point: RawPoint) -> bool {
        self.inner.is_point_inside(handle, point)
    }
    fn rectangle_corners(&self, handle: RawHandle) -> (RawPoint, RawPoint) {
        self.inner.rectangle_corners(handle)
    }
    fn circle_params(&self, handle: RawHandle) -> (RawPoint, f64) {
        self.inner.circle_params(handle)
    }
    unsafe fn enumerate_polygon_points(
        &self,
        handle: RawHandle,
        callback: PointCallback,
        context: *mut c_void,
    ) -> ResultCode {
        unsafe { self.inner.enumerate_polygon_points(handle, callback, context) }
    }
}

#[test]
fn rectangle_scenario() {
    let eng = engine();
    let rect = RectangleBoundary::new(eng.clone(), c(10.0, 10.0), c(0.0, 0.0)).unwrap();
    assert!(rect.contains_coordinate(c(5.0, 5.0)).unwrap());
    assert!(!rect.contains_coordinate(c(20.0, 20.0)).unwrap());
    assert_eq!(rect.top_left().unwrap(), c(10.0, 10.0));
    assert_eq!(rect.bottom_right().unwrap(), c(0.0, 0.0));
    assert_eq!(rect.corners().unwrap(), (c(10.0, 10.0), c(0.0, 0.0)));
    rect.dispose().unwrap();
    assert_eq!(eng.stats().live(), 0);
}

#[test]
fn polygon_scenario_keeps_vertex_order() {
    let eng = engine();
    let square = [c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0)];
    let poly = PolygonBoundary::new(eng.clone(), &square).unwrap();
    assert_eq!(poly.coordinates().unwrap(), square.to_vec());
    assert!(poly.contains_coordinate(c(5.0, 5.0)).unwrap());
    assert!(!poly.contains_coordinate(c(15.0, 5.0)).unwrap());
    poly.dispose().unwrap();
    assert_eq!(eng.stats().live(), 0);
}

#[test]
fn circle_accessors_and_containment() {
    let eng = engine();
    let center = c(48.8584, 2.2945);
    let circle = CircleBoundary::new(eng.clone(), center, 500.0).unwrap();
    assert_eq!(circle.center().unwrap(), center);
    assert_eq!(circle.radius().unwrap(), 500.0);
    assert_eq!(circle.params().unwrap(), (center, 500.0));
    assert!(circle.contains_coordinate(c(48.8600, 2.2950)).unwrap());
    assert!(!circle.contains_coordinate(c(48.8738, 2.2950)).unwrap());
    assert_eq!(circle.kind(), BoundaryKind::Circle);
}

#[test]
fn engine_rejection_maps_to_construction_failed() {
    let eng = engine();
    let err = CircleBoundary::new(eng.clone(), c(0.0, 0.0), -1.0).unwrap_err();
    assert_eq!(
        err,
        BoundaryError::ConstructionFailed {
            kind: BoundaryKind::Circle,
            code: codes::INVALID_RADIUS
        }
    );
    let err = PolygonBoundary::new(eng.clone(), &[c(0.0, 0.0), c(1.0, 1.0)]).unwrap_err();
    assert_eq!(err.code(), Some(codes::TOO_FEW_VERTICES));
    let err = RectangleBoundary::new(eng.clone(), c(0.0, 200.0), c(0.0, 0.0)).unwrap_err();
    assert_eq!(err.code(), Some(codes::INVALID_COORDINATE));
    let stats = eng.stats();
    assert_eq!(stats.created, 0);
    assert_eq!(stats.live(), 0);
}

#[test]
fn empty_polygon_never_reaches_the_engine() {
    let eng = Arc::new(FlakyEngine::new(codes::NONE));
    let err = PolygonBoundary::new(eng.clone(), &[]).unwrap_err();
    assert!(matches!(err, BoundaryError::InvalidInput { .. }));
    assert_eq!(eng.polygon_calls.load(Ordering::SeqCst), 0);
    assert_eq!(eng.inner.stats(), EngineStats::default());
}

#[test]
fn release_twice_destroys_once() {
    let eng = engine();
    let mut rect = RectangleBoundary::new(eng.clone(), c(1.0, 0.0), c(0.0, 1.0)).unwrap();
    assert!(!rect.is_released());
    rect.release().unwrap();
    rect.release().unwrap();
    assert!(rect.is_released());
    drop(rect);
    let stats = eng.stats();
    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.unknown_destroys, 0);
}

#[test]
fn queries_after_release_fail() {
    let eng = engine();
    let mut poly =
        PolygonBoundary::new(eng.clone(), &[c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)]).unwrap();
    let mut circle = CircleBoundary::new(eng.clone(), c(0.0, 0.0), 10.0).unwrap();
    let mut rect = RectangleBoundary::new(eng.clone(), c(1.0, 0.0), c(0.0, 1.0)).unwrap();
    poly.release().unwrap();
    circle.release().unwrap();
    rect.release().unwrap();

    let after = |kind| BoundaryError::UseAfterDispose { kind };
    assert_eq!(poly.coordinates().unwrap_err(), after(BoundaryKind::Polygon));
    assert_eq!(
        poly.contains_coordinate(c(0.2, 0.5)).unwrap_err(),
        after(BoundaryKind::Polygon)
    );
    assert_eq!(circle.radius().unwrap_err(), after(BoundaryKind::Circle));
    assert_eq!(circle.center().unwrap_err(), after(BoundaryKind::Circle));
    assert_eq!(rect.top_left().unwrap_err(), after(BoundaryKind::Rectangle));
    assert_eq!(rect.corners().unwrap_err(), after(BoundaryKind::Rectangle));
    assert_eq!(eng.stats().live(), 0);
}

#[test]
fn dispose_surfaces_destroy_failure_without_retry() {
    let eng = Arc::new(FlakyEngine::new(42));
    let mut rect = RectangleBoundary::new(eng.clone(), c(1.0, 0.0), c(0.0, 1.0)).unwrap();
    assert_eq!(
        rect.release().unwrap_err(),
        BoundaryError::ResourceDestroyFailed {
            kind: BoundaryKind::Rectangle,
            code: 42
        }
    );
    // Handle already gone: no second destroy, even on drop.
    rect.release().unwrap();
    drop(rect);
    assert_eq!(eng.inner.stats().destroyed, 1);
}

#[test]
fn drop_swallows_destroy_failure() {
    let eng = Arc::new(FlakyEngine::new(42));
    {
        let _circle = CircleBoundary::new(eng.clone(), c(0.0, 0.0), 5.0).unwrap();
    }
    let stats = eng.inner.stats();
    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.unknown_destroys, 0);
}

#[test]
fn boxed_boundaries_share_one_interface() {
    let eng = engine();
    let point = c(5.0, 5.0);
    let mut shapes: Vec<Box<dyn Boundary>> = vec![
        Box::new(RectangleBoundary::new(eng.clone(), c(10.0, 0.0), c(0.0, 10.0)).unwrap()),
        Box::new(CircleBoundary::new(eng.clone(), c(5.0, 5.0), 1_000.0).unwrap()),
        Box::new(
            PolygonBoundary::new(eng.clone(), &[c(20.0, 20.0), c(20.0, 30.0), c(30.0, 30.0)])
                .unwrap(),
        ),
    ];
    let hits: Vec<bool> = shapes
        .iter()
        .map(|b| b.contains_coordinate(point).unwrap())
        .collect();
    assert_eq!(hits, vec![true, true, false]);
    assert_eq!(eng.stats().live(), 3);
    for shape in shapes.iter_mut() {
        shape.release().unwrap();
    }
    assert_eq!(eng.stats().live(), 0);
    let last = shapes.pop().unwrap();
    assert!(last.is_released());
    last.dispose().unwrap();
}

#[test]
fn distinct_boundaries_work_across_threads() {
    let eng = engine();
    let workers: Vec<_> = (0..4)
        .map(|i| {
            let eng = eng.clone();
            std::thread::spawn(move || {
                let base = i as f64 * 10.0;
                let square = [
                    c(base, base),
                    c(base, base + 5.0),
                    c(base + 5.0, base + 5.0),
                    c(base + 5.0, base),
                ];
                let poly = PolygonBoundary::new(eng, &square).unwrap();
                let inside = poly.contains_coordinate(c(base + 2.5, base + 2.5)).unwrap();
                poly.dispose().unwrap();
                inside
            })
        })
        .collect();
    for w in workers {
        assert!(w.join().unwrap());
    }
    let stats = eng.stats();
    assert_eq!(stats.created, 4);
    assert_eq!(stats.live(), 0);
}

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
}

proptest! {
    #[test]
    fn polygon_round_trip_preserves_order(points in prop::collection::vec(coordinate(), 3..64)) {
        let eng = engine();
        let poly = PolygonBoundary::new(eng.clone(), &points).unwrap();
        prop_assert_eq!(poly.coordinates().unwrap(), points);
        poly.dispose().unwrap();
        prop_assert_eq!(eng.stats().live(), 0);
    }

    #[test]
    fn rectangle_and_circle_round_trip(
        top_left in coordinate(),
        bottom_right in coordinate(),
        radius in 0.001f64..2.0e7,
    ) {
        let eng = engine();
        let rect = RectangleBoundary::new(eng.clone(), top_left, bottom_right).unwrap();
        prop_assert_eq!(rect.top_left().unwrap(), top_left);
        prop_assert_eq!(rect.bottom_right().unwrap(), bottom_right);
        let circle = CircleBoundary::new(eng.clone(), top_left, radius).unwrap();
        prop_assert_eq!(circle.center().unwrap(), top_left);
        prop_assert_eq!(circle.radius().unwrap(), radius);
        // Corners are always inside their own rectangle.
        prop_assert!(rect.contains_coordinate(top_left).unwrap());
        prop_assert!(rect.contains_coordinate(bottom_right).unwrap());
    }
}
