//! Boundary definitions loaded from JSON and the boundaries built from them.
//!
//! File format: a JSON array of named shapes, e.g.
//! `[{"name": "yard", "kind": "circle",
//!    "center": {"latitude": 1.0, "longitude": 2.0}, "radius": 50.0}]`.
//! `kind` is one of `rectangle` (`top_left`, `bottom_right`), `circle`
//! (`center`, `radius` in meters) or `polygon` (`coordinates`).

use anyhow::{Context, Result};
use geobound::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Point> for Coordinate {
    fn from(p: Point) -> Self {
        Coordinate::new(p.latitude, p.longitude)
    }
}

impl From<Coordinate> for Point {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeDef {
    Rectangle { top_left: Point, bottom_right: Point },
    Circle { center: Point, radius: f64 },
    Polygon { coordinates: Vec<Point> },
}

#[derive(Clone, Debug, Deserialize)]
pub struct NamedShape {
    pub name: String,
    #[serde(flatten)]
    pub shape: ShapeDef,
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<NamedShape>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// A live boundary of any kind.
#[derive(Debug)]
pub enum Shape {
    Rectangle(RectangleBoundary),
    Circle(CircleBoundary),
    Polygon(PolygonBoundary),
}

#[derive(Debug)]
pub struct Fence {
    pub name: String,
    pub shape: Shape,
}

impl Fence {
    pub fn build(engine: &Arc<dyn GeometryEngine>, def: NamedShape) -> Result<Self> {
        let engine = engine.clone();
        let shape = match def.shape {
            ShapeDef::Rectangle {
                top_left,
                bottom_right,
            } => RectangleBoundary::new(engine, top_left.into(), bottom_right.into())
                .map(Shape::Rectangle),
            ShapeDef::Circle { center, radius } => {
                CircleBoundary::new(engine, center.into(), radius).map(Shape::Circle)
            }
            ShapeDef::Polygon { coordinates } => {
                let coords: Vec<Coordinate> = coordinates.into_iter().map(Into::into).collect();
                PolygonBoundary::new(engine, &coords).map(Shape::Polygon)
            }
        }
        .with_context(|| format!("building boundary {:?}", def.name))?;
        Ok(Self {
            name: def.name,
            shape,
        })
    }

    pub fn boundary(&self) -> &dyn Boundary {
        match &self.shape {
            Shape::Rectangle(b) => b,
            Shape::Circle(b) => b,
            Shape::Polygon(b) => b,
        }
    }

    pub fn contains(&self, point: Coordinate) -> Result<bool> {
        Ok(self.boundary().contains_coordinate(point)?)
    }

    /// Parameters as the engine reports them back.
    pub fn describe(&self) -> Result<Value> {
        let params = match &self.shape {
            Shape::Rectangle(b) => {
                let (top_left, bottom_right) = b.corners()?;
                json!({
                    "top_left": Point::from(top_left),
                    "bottom_right": Point::from(bottom_right),
                })
            }
            Shape::Circle(b) => {
                let (center, radius) = b.params()?;
                json!({ "center": Point::from(center), "radius": radius })
            }
            Shape::Polygon(b) => {
                let coordinates: Vec<Point> =
                    b.coordinates()?.into_iter().map(Point::from).collect();
                json!({ "coordinates": coordinates })
            }
        };
        Ok(json!({
            "name": self.name,
            "kind": self.boundary().kind().as_str(),
            "params": params,
        }))
    }

    pub fn dispose(self) -> Result<()> {
        let name = self.name;
        match self.shape {
            Shape::Rectangle(b) => b.dispose(),
            Shape::Circle(b) => b.dispose(),
            Shape::Polygon(b) => b.dispose(),
        }
        .with_context(|| format!("disposing boundary {name:?}"))
    }
}

/// Build every definition; on error the ones already built are released by drop.
pub fn build_all(engine: &Arc<dyn GeometryEngine>, defs: Vec<NamedShape>) -> Result<Vec<Fence>> {
    defs.into_iter().map(|def| Fence::build(engine, def)).collect()
}

/// Dispose all fences, reporting the first failure after trying every one.
pub fn dispose_all(fences: Vec<Fence>) -> Result<()> {
    let mut first_err = None;
    for fence in fences {
        if let Err(err) = fence.dispose() {
            tracing::warn!(error = %err, "dispose failed");
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SHAPES: &str = r#"[
        {"name": "box", "kind": "rectangle",
         "top_left": {"latitude": 10.0, "longitude": 10.0},
         "bottom_right": {"latitude": 0.0, "longitude": 0.0}},
        {"name": "ring", "kind": "circle",
         "center": {"latitude": 5.0, "longitude": 5.0}, "radius": 1000.0},
        {"name": "square", "kind": "polygon", "coordinates": [
            {"latitude": 0.0, "longitude": 0.0},
            {"latitude": 0.0, "longitude": 10.0},
            {"latitude": 10.0, "longitude": 10.0},
            {"latitude": 10.0, "longitude": 0.0}]}
    ]"#;

    #[test]
    fn load_build_describe_dispose() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shapes.json");
        fs::write(&path, SHAPES).unwrap();

        let reference = Arc::new(ReferenceEngine::new());
        let engine: Arc<dyn GeometryEngine> = reference.clone();
        let fences = build_all(&engine, load(&path).unwrap()).unwrap();
        assert_eq!(fences.len(), 3);

        let point = Coordinate::new(5.0, 5.0);
        for f in &fences {
            assert!(f.contains(point).unwrap(), "{} should contain the point", f.name);
        }
        let square = fences[2].describe().unwrap();
        assert_eq!(square["kind"], "polygon");
        assert_eq!(square["params"]["coordinates"][1]["longitude"], 10.0);
        let ring = fences[1].describe().unwrap();
        assert_eq!(ring["params"]["radius"], 1000.0);

        dispose_all(fences).unwrap();
        assert_eq!(reference.stats().live(), 0);
    }

    #[test]
    fn failed_build_leaks_nothing() {
        let defs: Vec<NamedShape> = serde_json::from_str(
            r#"[{"name": "ok", "kind": "circle",
                 "center": {"latitude": 0.0, "longitude": 0.0}, "radius": 5.0},
                {"name": "bad", "kind": "circle",
                 "center": {"latitude": 0.0, "longitude": 0.0}, "radius": 0.0}]"#,
        )
        .unwrap();
        let reference = Arc::new(ReferenceEngine::new());
        let engine: Arc<dyn GeometryEngine> = reference.clone();
        let err = build_all(&engine, defs).unwrap_err();
        assert!(format!("{err:#}").contains("\"bad\""));
        let stats = reference.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shapes.json");
        fs::write(&path, r#"[{"name": "x", "kind": "hexagon"}]"#).unwrap();
        assert!(load(&path).is_err());
    }
}
