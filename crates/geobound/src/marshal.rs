//! Coordinate marshaling across the engine seam.
//!
//! - `ForeignBuffer::pack`: one contiguous, exactly-sized `RawPoint` region in
//!   input order. Vertex order defines the polygon and is kept verbatim. The
//!   region is owned, so every exit path frees it.
//! - `unpack` / `unpack_with`: turn the engine's push-style enumeration
//!   (`extern "C"` callback + context pointer) into owned Rust values.
//!
//! Visitor panics never unwind through the engine frame: the trampoline
//! stores the payload, asks the engine to stop, and re-raises once the
//! engine call has returned.

use crate::coord::{Coordinate, RawPoint};
use crate::engine::{PointCallback, ResultCode};
use crate::error::BoundaryError;
use std::any::Any;
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};

/// Owned, contiguous point buffer handed to `GeometryEngine::create_polygon`.
#[derive(Debug)]
pub struct ForeignBuffer {
    points: Vec<RawPoint>,
}

impl ForeignBuffer {
    /// Pack `coordinates` in order. Allocation failure surfaces as
    /// `AllocationFailed` before anything reaches the engine.
    pub fn pack(coordinates: &[Coordinate]) -> Result<Self, BoundaryError> {
        let mut points: Vec<RawPoint> = Vec::new();
        points
            .try_reserve_exact(coordinates.len())
            .map_err(|_| BoundaryError::AllocationFailed {
                requested: coordinates.len(),
            })?;
        points.extend(coordinates.iter().map(RawPoint::from));
        tracing::trace!(count = points.len(), "packed polygon buffer");
        Ok(Self { points })
    }

    /// Start of the region; valid for `len()` reads while `self` is borrowed.
    #[inline]
    pub fn as_ptr(&self) -> *const RawPoint {
        self.points.as_ptr()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[RawPoint] {
        &self.points
    }
}

/// Visitor verdict for the element just produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    Continue,
    Stop,
}

struct Sink<F> {
    visitor: F,
    panic: Option<Box<dyn Any + Send>>,
}

unsafe extern "C" fn trampoline<F>(point: RawPoint, context: *mut c_void) -> bool
where
    F: FnMut(Coordinate) -> Visit,
{
    // SAFETY: `unpack_with` passes a live `&mut Sink<F>` as `context` and
    // outlives the engine call that invokes us.
    let sink = unsafe { &mut *context.cast::<Sink<F>>() };
    if sink.panic.is_some() {
        return false;
    }
    match panic::catch_unwind(AssertUnwindSafe(|| (sink.visitor)(point.into()))) {
        Ok(Visit::Continue) => true,
        Ok(Visit::Stop) => false,
        Err(payload) => {
            sink.panic = Some(payload);
            false
        }
    }
}

/// Drive `source(callback, context)` and feed each produced point to `visitor`.
///
/// `Err` carries the engine code returned by `source`.
pub fn unpack_with<S, F>(source: S, visitor: F) -> Result<(), i32>
where
    S: FnOnce(PointCallback, *mut c_void) -> ResultCode,
    F: FnMut(Coordinate) -> Visit,
{
    let mut sink = Sink {
        visitor,
        panic: None,
    };
    let context = (&mut sink as *mut Sink<F>).cast::<c_void>();
    let code = source(trampoline::<F>, context);
    if let Some(payload) = sink.panic.take() {
        panic::resume_unwind(payload);
    }
    code.check()
}

/// Collect every point the engine produces, in engine order.
pub fn unpack<S>(source: S) -> Result<Vec<Coordinate>, i32>
where
    S: FnOnce(PointCallback, *mut c_void) -> ResultCode,
{
    let mut out = Vec::new();
    unpack_with(source, |c| {
        out.push(c);
        Visit::Continue
    })?;
    Ok(out)
}
