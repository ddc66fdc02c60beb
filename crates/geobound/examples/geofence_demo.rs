//! Walk a few sample points through one boundary of each kind.
//!
//! Usage:
//!   cargo run -p geobound --example geofence_demo

use geobound::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), BoundaryError> {
    let engine: Arc<dyn GeometryEngine> = Arc::new(ReferenceEngine::new());

    let park = RectangleBoundary::new(
        engine.clone(),
        Coordinate::new(40.8003, -73.9582),
        Coordinate::new(40.7644, -73.9730),
    )?;
    let plaza = CircleBoundary::new(engine.clone(), Coordinate::new(40.7580, -73.9855), 250.0)?;
    let island = PolygonBoundary::new(
        engine.clone(),
        &[
            Coordinate::new(40.7003, -74.0188),
            Coordinate::new(40.7527, -74.0090),
            Coordinate::new(40.8795, -73.9330),
            Coordinate::new(40.7960, -73.9290),
            Coordinate::new(40.7101, -73.9760),
        ],
    )?;

    let samples = [
        ("bethesda terrace", Coordinate::new(40.7740, -73.9708)),
        ("times square", Coordinate::new(40.7580, -73.9855)),
        ("hoboken", Coordinate::new(40.7440, -74.0324)),
    ];
    for (name, p) in samples {
        println!(
            "{name:>18}: park={} plaza={} island={}",
            park.contains_coordinate(p)?,
            plaza.contains_coordinate(p)?,
            island.contains_coordinate(p)?
        );
    }
    println!("island vertices: {}", island.coordinates()?.len());

    park.dispose()?;
    plaza.dispose()?;
    island.dispose()?;
    Ok(())
}
