//! Coordinate values.
//!
//! - `Coordinate`: the in-process point handed to and returned by boundaries.
//! - `RawPoint`: `#[repr(C)]` layout passed across the engine boundary.
//!
//! Ranges are documented, not enforced: the engine decides what it accepts.

/// Valid latitude range (degrees).
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range (degrees).
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Geographic point in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinate {
    /// North-south position, expected in `[-90, 90]`.
    pub latitude: f64,
    /// East-west position, expected in `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside the documented ranges.
    ///
    /// Advisory only; boundary constructors never call this.
    pub fn is_in_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
    }
}

/// Engine-facing point layout. Field order is part of the ABI.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawPoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for RawPoint {
    #[inline]
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.latitude,
            lon: c.longitude,
        }
    }
}

impl From<&Coordinate> for RawPoint {
    #[inline]
    fn from(c: &Coordinate) -> Self {
        RawPoint::from(*c)
    }
}

impl From<RawPoint> for Coordinate {
    #[inline]
    fn from(p: RawPoint) -> Self {
        Coordinate::new(p.lat, p.lon)
    }
}
