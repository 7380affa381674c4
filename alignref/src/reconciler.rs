//! Geometry reconciliation: horizontal transformation plus elevation policy over points and polylines.

use std::sync::Arc;

use alignref_types::{CartesianPoint2d, CrsDescriptor, Geometry, Polyline, SpatialPoint};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::elevation::{plan_elevation, ElevationAction};
use crate::error::Result;
use crate::transform::HorizontalTransform;

/// Result of a successful reconciliation.
///
/// Keeps the source geometry next to the transformed one so that both can be inspected side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledGeometry {
    source: Geometry,
    geometry: Geometry,
    elevation: Option<ElevationAction>,
}

impl ReconciledGeometry {
    /// Geometry as it was supplied.
    pub fn source(&self) -> &Geometry {
        &self.source
    }

    /// Geometry bound to the target CRS.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// What was done to the elevation values. `None` if the source geometry has no elevation at all.
    pub fn elevation_action(&self) -> Option<ElevationAction> {
        self.elevation
    }

    /// Consumes the result, returning the reconciled geometry.
    pub fn into_geometry(self) -> Geometry {
        self.geometry
    }
}

/// Per-entity outcome of [`Reconciler::reconcile_batch`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntityReport {
    /// Position of the entity in the input.
    pub index: usize,
    /// Reconciliation result.
    pub outcome: Result<ReconciledGeometry>,
    /// Geometry reconciled without elevation, present when only the elevation failed.
    pub horizontal_only: Option<Geometry>,
}

/// Moves geometries into a target CRS.
///
/// Horizontal coordinates go through the injected [`HorizontalTransform`], elevations through the
/// [elevation policy](crate::elevation). Inputs are never modified; new geometries are returned.
#[derive(Clone)]
pub struct Reconciler {
    transform: Arc<dyn HorizontalTransform>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a new reconciler.
    pub fn new(transform: impl HorizontalTransform + 'static) -> Self {
        Self {
            transform: Arc::new(transform),
        }
    }

    /// Horizontal transform used by the reconciler.
    pub fn transform(&self) -> &dyn HorizontalTransform {
        self.transform.as_ref()
    }

    /// Reconciles a geometry into `target`.
    ///
    /// Fails atomically: if any vertex cannot be transformed, or any elevation cannot be expressed in the target
    /// vertical reference, no geometry is returned.
    pub fn reconcile(
        &self,
        geometry: &Geometry,
        target: &Arc<CrsDescriptor>,
    ) -> Result<ReconciledGeometry> {
        let (reconciled, elevation) = match geometry {
            Geometry::Point(point) => {
                let (point, action) = self.reconcile_point(point, target)?;
                (Geometry::Point(point), action)
            }
            Geometry::Polyline(polyline) => {
                let (polyline, action) = self.reconcile_polyline(polyline, target)?;
                (Geometry::Polyline(polyline), action)
            }
        };

        debug!(
            "Reconciled {} with {} vertices into {}",
            geometry.kind(),
            geometry.vertex_count(),
            target
        );

        Ok(ReconciledGeometry {
            source: geometry.clone(),
            geometry: reconciled,
            elevation,
        })
    }

    /// Reconciles a single point.
    pub fn reconcile_point(
        &self,
        point: &SpatialPoint,
        target: &Arc<CrsDescriptor>,
    ) -> Result<(SpatialPoint, Option<ElevationAction>)> {
        let (x, y) = self.horizontal(point, target)?;
        let (z, action) = match point.z() {
            Some(z) => {
                let action = plan_elevation(z, point.crs(), target)?;
                (Some(action.apply(z)), Some(action))
            }
            None => (None, None),
        };

        Ok((SpatialPoint::new(x, y, z, target.clone()), action))
    }

    /// Reconciles every vertex and the base elevation of a polyline.
    pub fn reconcile_polyline(
        &self,
        polyline: &Polyline,
        target: &Arc<CrsDescriptor>,
    ) -> Result<(Polyline, Option<ElevationAction>)> {
        let mut action = None;
        let mut vertices = Vec::with_capacity(polyline.vertices().len());
        for vertex in polyline.vertices() {
            let (reconciled, vertex_action) = self.reconcile_point(vertex, target)?;
            action = action.or(vertex_action);
            vertices.push(reconciled);
        }

        let base_elevation = match polyline.base_elevation() {
            Some(z) => {
                let base_action = plan_elevation(z, polyline.crs(), target)?;
                action = action.or(Some(base_action));
                Some(base_action.apply(z))
            }
            None => None,
        };

        let reconciled = Polyline::new(vertices, polyline.is_closed(), base_elevation)?;
        Ok((reconciled, action))
    }

    /// Reconciles only the horizontal coordinates, dropping all elevations.
    pub fn reconcile_horizontal(
        &self,
        geometry: &Geometry,
        target: &Arc<CrsDescriptor>,
    ) -> Result<Geometry> {
        let flatten = |point: &SpatialPoint| -> Result<SpatialPoint> {
            let (x, y) = self.horizontal(point, target)?;
            Ok(SpatialPoint::new(x, y, None, target.clone()))
        };

        Ok(match geometry {
            Geometry::Point(point) => Geometry::Point(flatten(point)?),
            Geometry::Polyline(polyline) => {
                let vertices = polyline
                    .vertices()
                    .iter()
                    .map(flatten)
                    .collect::<Result<Vec<_>>>()?;
                Geometry::Polyline(Polyline::new(vertices, polyline.is_closed(), None)?)
            }
        })
    }

    /// Reconciles independent geometries in parallel.
    ///
    /// A failure of one entity never affects the others. Reports are returned in input order.
    pub fn reconcile_batch(
        &self,
        geometries: &[Geometry],
        target: &Arc<CrsDescriptor>,
    ) -> Vec<EntityReport> {
        let reports: Vec<EntityReport> = geometries
            .par_iter()
            .enumerate()
            .map(|(index, geometry)| self.report(index, geometry, target))
            .collect();

        let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
        info!(
            "Reconciled {} of {} entities into {}",
            reports.len() - failed,
            reports.len(),
            target
        );

        reports
    }

    fn report(
        &self,
        index: usize,
        geometry: &Geometry,
        target: &Arc<CrsDescriptor>,
    ) -> EntityReport {
        let outcome = self.reconcile(geometry, target);
        let horizontal_only = match &outcome {
            Ok(_) => None,
            Err(err) => {
                warn!("Entity {index} ({}) was not reconciled: {err}", geometry.kind());
                if err.is_elevation_error() {
                    self.reconcile_horizontal(geometry, target).ok()
                } else {
                    None
                }
            }
        };

        EntityReport {
            index,
            outcome,
            horizontal_only,
        }
    }

    fn horizontal(&self, point: &SpatialPoint, target: &CrsDescriptor) -> Result<(f64, f64)> {
        let from = point.crs();
        if from.same_horizontal(target) {
            debug!("{}: horizontal identity", from.horizontal_id());
            return Ok((point.x(), point.y()));
        }

        self.transform.transform(point.x(), point.y(), from, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::transform::GridRegistry;
    use alignref_types::{LinearUnit, VerticalReference};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    const US_FOOT: f64 = 1200.0 / 3937.0;

    struct Refusing;

    impl HorizontalTransform for Refusing {
        fn transform(
            &self,
            _x: f64,
            _y: f64,
            from: &CrsDescriptor,
            to: &CrsDescriptor,
        ) -> Result<(f64, f64)> {
            Err(ReconcileError::UnsupportedCrsPair {
                from: from.horizontal_id().into(),
                to: to.horizontal_id().into(),
                reason: "test".into(),
            })
        }
    }

    fn harn_ft(vertical: VerticalReference) -> Arc<CrsDescriptor> {
        Arc::new(CrsDescriptor::new("EPSG:2871", LinearUnit::UsSurveyFoot, vertical))
    }

    fn harn_m(vertical: VerticalReference) -> Arc<CrsDescriptor> {
        Arc::new(CrsDescriptor::new("EPSG:2767", LinearUnit::Meter, vertical))
    }

    fn navd88() -> VerticalReference {
        VerticalReference::Orthometric("NAVD88".into())
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(GridRegistry::california_zone2().unwrap())
    }

    #[test]
    fn identity_keeps_values_exactly() {
        let crs = harn_ft(navd88());
        let point = SpatialPoint::new(6829001.34, 2187051.01, Some(2235.97), crs.clone());
        let result = Reconciler::new(Refusing)
            .reconcile(&point.clone().into(), &crs)
            .unwrap();

        assert_eq!(result.geometry(), &Geometry::Point(point.clone()));
        assert_eq!(result.source(), &Geometry::Point(point));
        assert_eq!(result.elevation_action(), Some(ElevationAction::Unchanged));
    }

    #[test]
    fn point_with_elevation_is_scaled() {
        let point = SpatialPoint::new(
            6829001.34,
            2187051.01,
            Some(2235.97),
            harn_ft(VerticalReference::None),
        );
        let target = harn_m(VerticalReference::None);
        let (reconciled, action) = reconciler().reconcile_point(&point, &target).unwrap();

        assert_abs_diff_eq!(reconciled.x(), 6829001.34 * US_FOOT, epsilon = 1e-9);
        assert_abs_diff_eq!(reconciled.z().unwrap(), 2235.97 * US_FOOT, epsilon = 1e-9);
        assert_matches!(action, Some(ElevationAction::Scale(_)));
        assert_eq!(reconciled.crs(), &target);
    }

    #[test]
    fn point_without_elevation_has_no_action() {
        let point = SpatialPoint::new(1.0, 2.0, None, harn_ft(VerticalReference::None));
        let (reconciled, action) = reconciler()
            .reconcile_point(&point, &harn_m(navd88()))
            .unwrap();
        assert_eq!(reconciled.z(), None);
        assert_eq!(action, None);
    }

    #[test]
    fn polyline_fails_atomically() {
        let crs = harn_ft(navd88());
        let polyline = Polyline::open(vec![
            SpatialPoint::new(0.0, 0.0, Some(10.0), crs.clone()),
            SpatialPoint::new(10.0, 0.0, Some(11.0), crs.clone()),
        ])
        .unwrap();
        let target = harn_m(VerticalReference::Ellipsoidal("GRS80".into()));

        assert_matches!(
            reconciler().reconcile(&polyline.into(), &target),
            Err(ReconcileError::UnsupportedVerticalDatumShift { z, .. }) if z == 10.0
        );
    }

    #[test]
    fn polyline_base_elevation_is_reconciled() {
        let crs = harn_ft(navd88());
        let polyline = Polyline::new(
            vec![
                SpatialPoint::new(0.0, 0.0, None, crs.clone()),
                SpatialPoint::new(3937.0, 0.0, None, crs.clone()),
            ],
            true,
            Some(3937.0),
        )
        .unwrap();

        let (reconciled, action) = reconciler()
            .reconcile_polyline(&polyline, &harn_m(navd88()))
            .unwrap();
        assert!(reconciled.is_closed());
        assert_abs_diff_eq!(reconciled.base_elevation().unwrap(), 1200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(reconciled.vertices()[1].x(), 1200.0, epsilon = 1e-9);
        assert_matches!(action, Some(ElevationAction::Scale(_)));
    }

    #[test]
    fn undeclared_datum_is_ambiguous() {
        let point = SpatialPoint::new(1.0, 2.0, Some(3.0), harn_ft(VerticalReference::None));
        assert_matches!(
            reconciler().reconcile(&point.into(), &harn_m(navd88())),
            Err(ReconcileError::AmbiguousVerticalSemantics { .. })
        );
    }

    #[test]
    fn batch_isolates_failures() {
        let ft = harn_ft(navd88());
        let unknown = Arc::new(CrsDescriptor::horizontal("EPSG:9999", LinearUnit::Meter));
        let geometries: Vec<Geometry> = vec![
            SpatialPoint::new(3937.0, 3937.0, Some(3937.0), ft.clone())
                .into(),
            SpatialPoint::new(1.0, 1.0, None, unknown).into(),
            SpatialPoint::new(3937.0, 0.0, Some(5.0), harn_ft(VerticalReference::None))
                .into(),
        ];

        let reports = reconciler().reconcile_batch(&geometries, &harn_m(navd88()));
        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );

        assert!(reports[0].outcome.is_ok());
        assert!(reports[0].horizontal_only.is_none());

        assert_matches!(
            reports[1].outcome,
            Err(ReconcileError::UnsupportedCrsPair { .. })
        );
        assert!(reports[1].horizontal_only.is_none());

        assert_matches!(
            reports[2].outcome,
            Err(ReconcileError::AmbiguousVerticalSemantics { .. })
        );
        let flat = reports[2].horizontal_only.as_ref().unwrap();
        assert_abs_diff_eq!(flat.anchor().x(), 1200.0, epsilon = 1e-9);
        assert_eq!(flat.anchor().z(), None);
    }
}
