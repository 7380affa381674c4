//! Geometries handled by the engine: single points and polylines.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::CrsDescriptor;
use crate::polyline::Polyline;
use crate::spatial_point::SpatialPoint;

/// Kind of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    /// Single point.
    Point,
    /// Polyline.
    Polyline,
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GeometryKind::Point => "Point",
            GeometryKind::Polyline => "Polyline",
        })
    }
}

/// Either a single surveyed point or a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Single point.
    Point(SpatialPoint),
    /// Polyline.
    Polyline(Polyline),
}

impl Geometry {
    /// Kind of the geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polyline(_) => GeometryKind::Polyline,
        }
    }

    /// Coordinate system the geometry is bound to.
    pub fn crs(&self) -> &Arc<CrsDescriptor> {
        match self {
            Geometry::Point(p) => p.crs(),
            Geometry::Polyline(l) => l.crs(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::Polyline(l) => l.vertices().len(),
        }
    }

    /// First vertex of the geometry, used as its anchor position.
    pub fn anchor(&self) -> &SpatialPoint {
        match self {
            Geometry::Point(p) => p,
            Geometry::Polyline(l) => &l.vertices()[0],
        }
    }

    /// Returns the point if the geometry is a point.
    pub fn as_point(&self) -> Option<&SpatialPoint> {
        match self {
            Geometry::Point(p) => Some(p),
            Geometry::Polyline(_) => None,
        }
    }

    /// Returns the polyline if the geometry is a polyline.
    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Geometry::Point(_) => None,
            Geometry::Polyline(l) => Some(l),
        }
    }
}

impl From<SpatialPoint> for Geometry {
    fn from(value: SpatialPoint) -> Self {
        Self::Point(value)
    }
}

impl From<Polyline> for Geometry {
    fn from(value: Polyline) -> Self {
        Self::Polyline(value)
    }
}
