use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geobound::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::SubscriberBuilder;

mod shapes;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Point-in-boundary queries against the geometry engine")]
struct Cmd {
    /// Earth radius (meters) used by circle boundaries
    #[arg(long, global = true)]
    earth_radius_m: Option<f64>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Test one point against every boundary in a shapes file
    Contains {
        #[arg(long)]
        shapes: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Print each boundary's parameters as stored by the engine
    Describe {
        #[arg(long)]
        shapes: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let engine = engine(cmd.earth_radius_m)?;
    let out = match cmd.action {
        Action::Contains { shapes, lat, lon } => {
            contains(&engine, &shapes, Coordinate::new(lat, lon))?
        }
        Action::Describe { shapes } => describe(&engine, &shapes)?,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn engine(earth_radius_m: Option<f64>) -> Result<Arc<dyn GeometryEngine>> {
    let mut cfg = EngineCfg::default();
    if let Some(r) = earth_radius_m {
        cfg.earth_radius_m = r;
    }
    let engine = ReferenceEngine::with_cfg(cfg).context("--earth-radius-m")?;
    tracing::debug!(earth_radius_m = engine.cfg().earth_radius_m, "engine ready");
    Ok(Arc::new(engine))
}

fn contains(engine: &Arc<dyn GeometryEngine>, path: &Path, point: Coordinate) -> Result<Value> {
    tracing::info!(
        shapes = %path.display(),
        lat = point.latitude,
        lon = point.longitude,
        "contains"
    );
    let fences = shapes::build_all(engine, shapes::load(path)?)?;
    let mut rows = Vec::with_capacity(fences.len());
    for fence in &fences {
        rows.push(json!({
            "name": fence.name,
            "kind": fence.boundary().kind().as_str(),
            "contains": fence.contains(point)?,
        }));
    }
    shapes::dispose_all(fences)?;
    Ok(Value::Array(rows))
}

fn describe(engine: &Arc<dyn GeometryEngine>, path: &Path) -> Result<Value> {
    tracing::info!(shapes = %path.display(), "describe");
    let fences = shapes::build_all(engine, shapes::load(path)?)?;
    let rows = fences
        .iter()
        .map(|f| f.describe())
        .collect::<Result<Vec<_>>>()?;
    shapes::dispose_all(fences)?;
    Ok(Value::Array(rows))
}
