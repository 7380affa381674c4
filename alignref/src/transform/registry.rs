use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

#[cfg(feature = "geodesy")]
use alignref_types::geo::GeodesyProjection;
use alignref_types::geo::{ChainProjection, Datum, GeoPoint2d, InvertedProjection, Projection};
use alignref_types::{CrsDescriptor, LinearUnit, Point2d};
use log::debug;

use crate::error::{ReconcileError, Result};
use crate::transform::HorizontalTransform;

type GeoProjection = dyn Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + Send + Sync;

/// How coordinates of a grid relate to geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GridKind {
    /// Projected grid. `definition` uses geodesy operator syntax and produces meters.
    Projected {
        /// Operator definition.
        definition: String,
    },
    /// Geographic coordinates: x is longitude and y is latitude, both in degrees.
    Geographic,
}

/// Description of a horizontal reference system known to a [`GridRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridDefinition {
    grid: String,
    datum: String,
    native_unit: Option<LinearUnit>,
    kind: GridKind,
}

impl GridDefinition {
    /// Projected grid.
    ///
    /// Systems that share the `grid` key differ only by their linear unit, so conversions between them are pure
    /// scaling.
    pub fn projected(
        grid: impl Into<String>,
        datum: impl Into<String>,
        native_unit: LinearUnit,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            grid: grid.into(),
            datum: datum.into(),
            native_unit: Some(native_unit),
            kind: GridKind::Projected {
                definition: definition.into(),
            },
        }
    }

    /// Geographic (longitude, latitude) system.
    pub fn geographic(grid: impl Into<String>, datum: impl Into<String>) -> Self {
        Self {
            grid: grid.into(),
            datum: datum.into(),
            native_unit: None,
            kind: GridKind::Geographic,
        }
    }

    /// Grid family key.
    pub fn grid(&self) -> &str {
        &self.grid
    }

    /// Geodetic datum tag.
    pub fn datum(&self) -> &str {
        &self.datum
    }

    /// Linear unit the system is defined with. `None` for geographic systems.
    pub fn native_unit(&self) -> Option<LinearUnit> {
        self.native_unit
    }

    /// Projection kind.
    pub fn kind(&self) -> &GridKind {
        &self.kind
    }

    /// Returns true for geographic systems.
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, GridKind::Geographic)
    }
}

struct GridEntry {
    definition: GridDefinition,
    projection: Option<Arc<GeoProjection>>,
}

/// Registry of horizontal reference systems, used as the default [`HorizontalTransform`].
///
/// For every call the cheapest exact path is chosen:
/// 1. same id and unit: coordinates are returned untouched;
/// 2. same grid family: unit scaling only;
/// 3. different grids with equal or declared-equivalent datums: inverse projection to geographic coordinates and
///    forward projection into the target grid;
/// 4. anything else fails with [`ReconcileError::UnsupportedCrsPair`].
#[derive(Default)]
pub struct GridRegistry {
    grids: HashMap<String, GridEntry>,
    equivalent_datums: Vec<(String, String)>,
}

impl GridRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the California State Plane zone 2 systems (NAD83 and NAD83(HARN), meters and US survey feet)
    /// and WGS84 geographic coordinates.
    ///
    /// NAD83 family datums are declared equivalent to each other and to WGS84, which is accurate to about a meter.
    pub fn california_zone2() -> Result<Self> {
        let lcc = format!(
            "lcc lat_1=39.833333333333 lat_2=38.333333333333 lat_0=37.666666666667 lon_0=-122 x_0=2000000 y_0=500000 ellps={}",
            Datum::GRS80.name()
        );

        let mut registry = Self::new();
        registry.register(
            "EPSG:2226",
            GridDefinition::projected("ca-zone2-nad83", "NAD83", LinearUnit::UsSurveyFoot, &lcc),
        )?;
        registry.register(
            "EPSG:2767",
            GridDefinition::projected("ca-zone2-harn", "NAD83(HARN)", LinearUnit::Meter, &lcc),
        )?;
        registry.register(
            "EPSG:2871",
            GridDefinition::projected(
                "ca-zone2-harn",
                "NAD83(HARN)",
                LinearUnit::UsSurveyFoot,
                &lcc,
            ),
        )?;
        registry.register("EPSG:4326", GridDefinition::geographic("wgs84", "WGS84"))?;

        registry.declare_equivalent_datums("NAD83", "NAD83(HARN)");
        registry.declare_equivalent_datums("NAD83", "WGS84");
        registry.declare_equivalent_datums("NAD83(HARN)", "WGS84");

        Ok(registry)
    }

    /// Adds a reference system. Replaces the previous definition with the same id.
    ///
    /// Fails with [`ReconcileError::InvalidConfig`] if the projection definition cannot be parsed.
    pub fn register(&mut self, id: impl Into<String>, definition: GridDefinition) -> Result<()> {
        let id = id.into();
        let projection = match &definition.kind {
            GridKind::Geographic => Some(Arc::new(GeographicAxes) as Arc<GeoProjection>),
            GridKind::Projected { definition } => build_projection(&id, definition)?,
        };

        self.grids.insert(
            id,
            GridEntry {
                definition,
                projection,
            },
        );
        Ok(())
    }

    /// Declares two geodetic datums interchangeable for horizontal transformations.
    pub fn declare_equivalent_datums(&mut self, a: impl Into<String>, b: impl Into<String>) {
        self.equivalent_datums.push((a.into(), b.into()));
    }

    /// Definition registered for the id.
    pub fn definition(&self, id: &str) -> Option<&GridDefinition> {
        self.grids.get(id).map(|entry| &entry.definition)
    }

    fn datums_compatible(&self, a: &str, b: &str) -> bool {
        a == b
            || self
                .equivalent_datums
                .iter()
                .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    fn entry(
        &self,
        crs: &CrsDescriptor,
        from: &CrsDescriptor,
        to: &CrsDescriptor,
    ) -> Result<&GridEntry> {
        self.grids
            .get(crs.horizontal_id())
            .ok_or_else(|| {
                unsupported(
                    from,
                    to,
                    format!("unknown horizontal id {}", crs.horizontal_id()),
                )
            })
    }

    /// Chooses the transformation path between two systems.
    pub fn route(&self, from: &CrsDescriptor, to: &CrsDescriptor) -> Result<TransformRoute> {
        if from.same_horizontal(to) {
            return Ok(TransformRoute::Identity);
        }

        let src = self.entry(from, from, to)?;
        let dst = self.entry(to, from, to)?;

        if src.definition.grid == dst.definition.grid {
            if src.definition.is_geographic() {
                return Ok(TransformRoute::Identity);
            }
            return Ok(TransformRoute::Scale(from.linear_unit().factor_to(to.linear_unit())));
        }

        if !self.datums_compatible(&src.definition.datum, &dst.definition.datum) {
            return Err(unsupported(
                from,
                to,
                format!(
                    "datum {} has no declared equivalence with {}",
                    src.definition.datum, dst.definition.datum
                ),
            ));
        }

        let (Some(src_projection), Some(dst_projection)) = (&src.projection, &dst.projection)
        else {
            return Err(unsupported(from, to, "reprojection support is not enabled".into()));
        };

        let input_scale = if src.definition.is_geographic() {
            1.0
        } else {
            from.linear_unit().to_meters()
        };
        let output_scale = if dst.definition.is_geographic() {
            1.0
        } else {
            1.0 / to.linear_unit().to_meters()
        };

        Ok(TransformRoute::Reproject(Reprojection {
            chain: ChainProjection::new(
                Box::new(InvertedProjection::new(Box::new(src_projection.clone()))),
                Box::new(dst_projection.clone()),
            ),
            input_scale,
            output_scale,
        }))
    }
}

impl Debug for GridRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.grids.keys().collect();
        ids.sort();
        f.debug_struct("GridRegistry")
            .field("grids", &ids)
            .field("equivalent_datums", &self.equivalent_datums)
            .finish()
    }
}

impl HorizontalTransform for GridRegistry {
    fn transform(
        &self,
        x: f64,
        y: f64,
        from: &CrsDescriptor,
        to: &CrsDescriptor,
    ) -> Result<(f64, f64)> {
        let route = self.route(from, to)?;
        debug!("{} -> {}: {:?}", from.horizontal_id(), to.horizontal_id(), route);

        route.apply(x, y).ok_or_else(|| ReconcileError::ProjectionFailed {
            from: from.horizontal_id().to_string(),
            to: to.horizontal_id().to_string(),
            x,
            y,
        })
    }

    fn is_geographic(&self, crs: &CrsDescriptor) -> bool {
        self.definition(crs.horizontal_id())
            .is_some_and(GridDefinition::is_geographic)
    }
}

/// Transformation path chosen by [`GridRegistry::route`].
pub enum TransformRoute {
    /// Coordinates are returned untouched.
    Identity,
    /// Both coordinates are multiplied by the factor.
    Scale(f64),
    /// Coordinates are reprojected through geographic coordinates.
    Reproject(Reprojection),
}

impl TransformRoute {
    /// Applies the route to a coordinate pair. Returns `None` if the projection fails.
    pub fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            TransformRoute::Identity => Some((x, y)),
            TransformRoute::Scale(factor) => Some((x * factor, y * factor)),
            TransformRoute::Reproject(reprojection) => reprojection.apply(x, y),
        }
    }
}

impl Debug for TransformRoute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformRoute::Identity => write!(f, "identity"),
            TransformRoute::Scale(factor) => write!(f, "unit scaling by {factor}"),
            TransformRoute::Reproject(_) => write!(f, "reprojection"),
        }
    }
}

/// Inverse projection of the source grid followed by forward projection into the target grid.
pub struct Reprojection {
    chain: ChainProjection<Point2d, GeoPoint2d, Point2d>,
    input_scale: f64,
    output_scale: f64,
}

impl Reprojection {
    fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let projected = self
            .chain
            .project(&Point2d::new(x * self.input_scale, y * self.input_scale))?;
        let (x, y) = (projected.x * self.output_scale, projected.y * self.output_scale);
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}

struct GeographicAxes;

impl Projection for GeographicAxes {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2d;

    fn project(&self, input: &GeoPoint2d) -> Option<Point2d> {
        Some(Point2d::new(input.lon(), input.lat()))
    }

    fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d> {
        let point = GeoPoint2d::latlon(input.y, input.x);
        point.is_valid().then_some(point)
    }
}

#[cfg(feature = "geodesy")]
fn build_projection(id: &str, definition: &str) -> Result<Option<Arc<GeoProjection>>> {
    let projection = GeodesyProjection::new(definition).ok_or_else(|| {
        ReconcileError::InvalidConfig(format!(
            "cannot parse projection definition '{definition}' of {id}"
        ))
    })?;
    Ok(Some(Arc::new(projection)))
}

#[cfg(not(feature = "geodesy"))]
fn build_projection(_id: &str, _definition: &str) -> Result<Option<Arc<GeoProjection>>> {
    Ok(None)
}

fn unsupported(from: &CrsDescriptor, to: &CrsDescriptor, reason: String) -> ReconcileError {
    ReconcileError::UnsupportedCrsPair {
        from: from.horizontal_id().to_string(),
        to: to.horizontal_id().to_string(),
        reason,
    }
}
