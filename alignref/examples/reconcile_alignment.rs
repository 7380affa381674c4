//! This example reconciles a retaining wall alignment surveyed in US survey feet into WGS84 and prints station
//! labels together with geographic coordinates. Stations stay in survey feet.
//!
//! Run it without arguments to use the built-in configuration, or with a path to a JSON configuration file:
//!
//! ```shell
//! cargo run --example reconcile_alignment -- ./alignment.json
//! ```

use std::sync::Arc;

use alignref::alignref_types::{
    CartesianPoint2d, CrsDescriptor, Geometry, LinearUnit, SpatialPoint, VerticalReference,
};
use alignref::{AlignmentConfig, AlignmentPipeline, GridRegistry, StationValidation};
use anyhow::{anyhow, Result};

const DEFAULT_CONFIG: &str = r#"{
    "start_station": "300+00",
    "end_station": "304+88",
    "station_tolerance": 1.0,
    "naming_scheme": "station",
    "elevation_mode": "clamp_to_ground"
}"#;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_CONFIG.to_string(),
    };
    let config = AlignmentConfig::from_json(&config)?;

    let survey = Arc::new(CrsDescriptor::new(
        "EPSG:2871",
        LinearUnit::UsSurveyFoot,
        VerticalReference::None,
    ));
    let wgs84 = Arc::new(CrsDescriptor::horizontal("EPSG:4326", LinearUnit::Meter));

    // Stations are measured in the survey grid, coordinates come out in WGS84.
    let pipeline = AlignmentPipeline::new(GridRegistry::california_zone2()?, config)?;
    let output = pipeline.process(&wall(&survey), &wgs84);

    let stations = output
        .stations
        .ok_or_else(|| anyhow!("configuration has no start station"))??;
    for entity in &output.entities {
        let geometry = match &entity.result {
            Ok(reconciled) => reconciled.geometry(),
            Err(err) => {
                println!("{}: {err}", entity.label);
                continue;
            }
        };
        let anchor = geometry.anchor();
        println!(
            "{:>14}  lon {:.8}  lat {:.8}",
            entity.label,
            anchor.x(),
            anchor.y()
        );
    }

    if let Some((point, _)) = stations.locate(30244.0) {
        println!("Sta 302+44.00 is at E {:.2} N {:.2} ftUS", point.x, point.y);
    }

    match stations.validation() {
        StationValidation::Mismatch(warning) => println!("warning: {warning}"),
        StationValidation::WithinTolerance { discrepancy } => {
            println!("station range matches within {discrepancy:.2} ft")
        }
        StationValidation::Degenerate { .. } | StationValidation::NotRequested => {}
    }

    Ok(())
}

fn wall(crs: &Arc<CrsDescriptor>) -> Vec<Geometry> {
    (0..9)
        .map(|i| {
            SpatialPoint::new(
                6829001.34 + i as f64 * 61.0,
                2187051.01 + i as f64 * 0.5,
                Some(2235.97),
                crs.clone(),
            )
            .into()
        })
        .collect()
}
