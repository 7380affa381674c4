//! Full processing of an alignment: reconciliation, stations and labels.

use std::sync::Arc;

use alignref_types::{CrsDescriptor, Geometry, SpatialPoint};
use log::{debug, info, warn};

use crate::config::AlignmentConfig;
use crate::error::{ReconcileError, Result};
use crate::naming::{label, GeometrySummary};
use crate::reconciler::{EntityReport, ReconciledGeometry, Reconciler};
use crate::station::{compute_stations, StationAssignment, StationRun};
use crate::transform::HorizontalTransform;

/// One input entity after processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEntity {
    /// Position of the entity in the input.
    pub index: usize,
    /// Label according to the configured naming scheme.
    pub label: String,
    /// Reconciliation result.
    pub result: Result<ReconciledGeometry>,
    /// Geometry reconciled without elevation, present when only the elevation failed.
    pub horizontal_only: Option<Geometry>,
    /// Elevation of the anchor point handed to the renderer, see
    /// [`ElevationMode`](crate::config::ElevationMode).
    pub output_elevation: Option<f64>,
}

/// Result of [`AlignmentPipeline::process`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutput {
    /// Entities in input order.
    pub entities: Vec<ProcessedEntity>,
    /// Stations of the successfully reconciled entities, if a start station is configured. Fails if no planar
    /// system is available to measure them in.
    pub stations: Option<Result<StationRun>>,
}

impl AlignmentOutput {
    /// Entities that failed to reconcile.
    pub fn failures(&self) -> impl Iterator<Item = &ProcessedEntity> {
        self.entities.iter().filter(|entity| entity.result.is_err())
    }
}

/// Chains reconciliation, linear referencing and labeling.
#[derive(Debug, Clone)]
pub struct AlignmentPipeline {
    reconciler: Reconciler,
    config: AlignmentConfig,
}

impl AlignmentPipeline {
    /// Creates a new pipeline. Fails if the configuration is inconsistent.
    pub fn new(
        transform: impl HorizontalTransform + 'static,
        config: AlignmentConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reconciler: Reconciler::new(transform),
            config,
        })
    }

    /// Configuration of the pipeline.
    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Reconciler used by the pipeline.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Processes an ordered alignment.
    ///
    /// Every entity is reconciled into `target` independently. Stations are computed in input order over the anchor
    /// points (first vertices) of the entities that were reconciled. They are measured in the target CRS unless it is
    /// geographic; then the source grid of the first reconciled entity is used instead, and
    /// [`ReconcileError::GeographicStations`] is reported if that one is geographic too. Failed entities get no
    /// station and keep a label derived from their source geometry.
    pub fn process(&self, geometries: &[Geometry], target: &Arc<CrsDescriptor>) -> AlignmentOutput {
        let reports = self.reconciler.reconcile_batch(geometries, target);

        let stations = self.config.start_station.map(|start| -> Result<StationRun> {
            let anchors = self.station_anchors(&reports, target)?;
            Ok(compute_stations(
                &anchors,
                start,
                self.config.end_station,
                self.config.station_tolerance,
                self.config.station_format,
            ))
        });
        if let Some(Err(err)) = &stations {
            warn!("{err}");
        }

        let mut station_index = 0;
        let entities = reports
            .into_iter()
            .zip(geometries)
            .map(|(report, source)| {
                let station = match (&report.outcome, &stations) {
                    (Ok(_), Some(Ok(run))) => {
                        station_index += 1;
                        run.get(station_index - 1)
                    }
                    _ => None,
                };
                self.entity(report, source, station)
            })
            .collect::<Vec<_>>();

        info!(
            "Processed {} entities, {} failed",
            entities.len(),
            entities.iter().filter(|e| e.result.is_err()).count()
        );

        AlignmentOutput { entities, stations }
    }

    /// Planar system stations are measured in: `target` itself, or the source system of the first reconciled
    /// entity if `target` is geographic.
    fn station_crs(
        &self,
        reports: &[EntityReport],
        target: &Arc<CrsDescriptor>,
    ) -> Result<Arc<CrsDescriptor>> {
        let transform = self.reconciler.transform();
        if !transform.is_geographic(target) {
            return Ok(target.clone());
        }

        reports
            .iter()
            .filter_map(|report| report.outcome.as_ref().ok())
            .map(|reconciled| reconciled.source().crs())
            .find(|crs| !transform.is_geographic(crs))
            .cloned()
            .ok_or_else(|| ReconcileError::GeographicStations {
                crs: target.horizontal_id().to_string(),
                reason: "no reconciled entity has a planar source system".into(),
            })
    }

    fn station_anchors(
        &self,
        reports: &[EntityReport],
        target: &Arc<CrsDescriptor>,
    ) -> Result<Vec<SpatialPoint>> {
        let grid = self.station_crs(reports, target)?;
        let reconciled = reports
            .iter()
            .filter_map(|report| report.outcome.as_ref().ok());

        if Arc::ptr_eq(&grid, target) {
            return Ok(reconciled
                .map(|reconciled| reconciled.geometry().anchor().clone())
                .collect());
        }

        debug!("Measuring stations in {grid} instead of geographic {target}");
        reconciled
            .map(|reconciled| {
                let anchor = reconciled.source().anchor();
                if anchor.crs() == &grid {
                    Ok(anchor.clone())
                } else {
                    let (point, _) = self.reconciler.reconcile_point(&anchor.without_z(), &grid)?;
                    Ok(point)
                }
            })
            .collect()
    }

    fn entity(
        &self,
        report: EntityReport,
        source: &Geometry,
        station: Option<&StationAssignment>,
    ) -> ProcessedEntity {
        let geometry = match &report.outcome {
            Ok(reconciled) => reconciled.geometry(),
            Err(_) => source,
        };
        let summary = GeometrySummary::from(geometry);

        let name = match label(
            report.index,
            station,
            &summary,
            self.config.naming_scheme,
            &self.config.label_prefix,
        ) {
            Ok(name) => name,
            Err(err) => {
                warn!("{err}, using sequential label");
                format!("{} {}", summary.kind, report.index + 1)
            }
        };

        let output_elevation = match &report.outcome {
            Ok(reconciled) => self
                .config
                .elevation_mode
                .output_elevation(anchor_elevation(reconciled.geometry())),
            Err(_) => None,
        };

        ProcessedEntity {
            index: report.index,
            label: name,
            result: report.outcome,
            horizontal_only: report.horizontal_only,
            output_elevation,
        }
    }
}

fn anchor_elevation(geometry: &Geometry) -> Option<f64> {
    match geometry {
        Geometry::Point(point) => point.z(),
        Geometry::Polyline(polyline) => polyline.effective_z(0),
    }
}
