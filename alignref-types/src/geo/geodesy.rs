use geodesy::prelude::*;

use crate::cartesian::Point2d;
use crate::geo::datum::Datum;
use crate::geo::point::GeoPoint2d;
use crate::geo::projection::Projection;

/// Projection backed by a [`geodesy`] operator definition.
///
/// The definition uses geodesy's operator syntax (e.g. `lcc lat_1=39.8333 lat_2=38.3333 lat_0=37.6667 lon_0=-122
/// x_0=2000000 y_0=500000 ellps=GRS80`). Projected coordinates are in meters, whatever unit the owning coordinate
/// system declares; unit handling happens outside of this type.
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
    definition: String,
}

impl GeodesyProjection {
    /// Creates a new projection. Returns `None` if geodesy cannot parse the definition.
    pub fn new(definition: &str) -> Option<Self> {
        let mut context = Minimal::new();
        let op = context.op(definition).ok()?;
        Some(Self {
            context,
            op,
            definition: definition.to_string(),
        })
    }

    /// Operator definition this projection was created from.
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl std::fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyProjection")
            .field("definition", &self.definition)
            .finish()
    }
}

impl Projection for GeodesyProjection {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2d;

    fn project(&self, input: &GeoPoint2d) -> Option<Point2d> {
        let mut data = [Coor2D::geo(input.lat(), input.lon())];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Point2d::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d> {
        let mut data = [Coor2D([input.x, input.y])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        let point = GeoPoint2d::latlon(data[0].0[1].to_degrees(), data[0].0[0].to_degrees());
        point.is_valid().then_some(point)
    }
}

impl Datum {
    /// Length in meters of the shortest path between two points on the surface of the ellipsoid.
    pub fn geodesic_distance(&self, a: &GeoPoint2d, b: &GeoPoint2d) -> f64 {
        let ellipsoid = Ellipsoid::new(self.semimajor(), 1.0 / self.inv_flattening());
        ellipsoid.distance(
            &Coor4D::geo(a.lat(), a.lon(), 0.0, 0.0),
            &Coor4D::geo(b.lat(), b.lon(), 0.0, 0.0),
        )
    }
}
