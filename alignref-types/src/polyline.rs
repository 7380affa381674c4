//! Polyline is an ordered sequence of surveyed vertices.
//!
//! Polylines can be:
//! * **open** - the first and the last vertices are not connected. An alignment or a wall face is usually open.
//! * **closed** - the last vertex is connected back to the first one. The first vertex is not repeated at the end of
//!   the sequence, [`Polyline::iter_points_closing`] and [`Polyline::iter_segments`] deal with the closing segment.
//!
//! Vertex order is significant. All vertices of a polyline share one coordinate system, which is checked on
//! construction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::CrsDescriptor;
use crate::error::AlignrefTypesError;
use crate::segment::Segment;
use crate::spatial_point::SpatialPoint;

/// Ordered sequence of vertices bound to a single CRS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolylineParts")]
pub struct Polyline {
    vertices: Vec<SpatialPoint>,
    closed: bool,
    base_elevation: Option<f64>,
}

impl Polyline {
    /// Creates a new polyline.
    ///
    /// Fails if `vertices` is empty or if any vertex is bound to a CRS different from the first vertex.
    pub fn new(
        vertices: Vec<SpatialPoint>,
        closed: bool,
        base_elevation: Option<f64>,
    ) -> Result<Self, AlignrefTypesError> {
        let first = vertices.first().ok_or(AlignrefTypesError::EmptyPolyline)?;
        let crs = first.crs();

        if let Some((index, vertex)) = vertices
            .iter()
            .enumerate()
            .find(|(_, v)| !Arc::ptr_eq(v.crs(), crs) && v.crs() != crs)
        {
            return Err(AlignrefTypesError::MixedCrs {
                index,
                expected: crs.horizontal_id().to_string(),
                found: vertex.crs().horizontal_id().to_string(),
            });
        }

        Ok(Self {
            vertices,
            closed,
            base_elevation,
        })
    }

    /// Creates a new open polyline without base elevation.
    pub fn open(vertices: Vec<SpatialPoint>) -> Result<Self, AlignrefTypesError> {
        Self::new(vertices, false, None)
    }

    /// Creates a new closed polyline without base elevation.
    pub fn closed(vertices: Vec<SpatialPoint>) -> Result<Self, AlignrefTypesError> {
        Self::new(vertices, true, None)
    }

    /// Vertices in their original order.
    pub fn vertices(&self) -> &[SpatialPoint] {
        &self.vertices
    }

    /// Whether the last vertex connects back to the first.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Elevation applied to vertices that do not carry their own.
    pub fn base_elevation(&self) -> Option<f64> {
        self.base_elevation
    }

    /// Coordinate system shared by all vertices.
    pub fn crs(&self) -> &Arc<CrsDescriptor> {
        // Construction guarantees at least one vertex.
        self.vertices[0].crs()
    }

    /// Elevation of the vertex at `index`: its own elevation or the polyline base elevation.
    pub fn effective_z(&self, index: usize) -> Option<f64> {
        self.vertices
            .get(index)
            .and_then(|v| v.z().or(self.base_elevation))
    }

    /// Iterates over the vertices. For closed polylines the first vertex is repeated at the end.
    pub fn iter_points_closing(&self) -> impl Iterator<Item = &SpatialPoint> {
        let closing = if self.closed && self.vertices.len() > 1 {
            self.vertices.first()
        } else {
            None
        };
        self.vertices.iter().chain(closing)
    }

    /// Iterates over segments, including the closing segment of a closed polyline.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, SpatialPoint>> {
        let points: Vec<&SpatialPoint> = self.iter_points_closing().collect();
        (1..points.len()).map(move |i| Segment(points[i - 1], points[i]))
    }

    /// Total planar length of the polyline in the CRS linear unit.
    pub fn length(&self) -> f64 {
        self.iter_segments().map(|s| s.length()).sum()
    }
}

#[derive(Deserialize)]
struct PolylineParts {
    vertices: Vec<SpatialPoint>,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    base_elevation: Option<f64>,
}

impl TryFrom<PolylineParts> for Polyline {
    type Error = AlignrefTypesError;

    fn try_from(value: PolylineParts) -> Result<Self, Self::Error> {
        Self::new(value.vertices, value.closed, value.base_elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::LinearUnit;
    use assert_matches::assert_matches;

    fn crs(id: &str) -> Arc<CrsDescriptor> {
        Arc::new(CrsDescriptor::horizontal(id, LinearUnit::Meter))
    }

    fn pt(x: f64, y: f64, crs: &Arc<CrsDescriptor>) -> SpatialPoint {
        SpatialPoint::new(x, y, None, crs.clone())
    }

    #[test]
    fn empty_is_rejected() {
        assert_matches!(Polyline::open(vec![]), Err(AlignrefTypesError::EmptyPolyline));
    }

    #[test]
    fn mixed_crs_is_rejected() {
        let a = crs("EPSG:2767");
        let b = crs("EPSG:2871");
        let result = Polyline::open(vec![pt(0.0, 0.0, &a), pt(1.0, 0.0, &a), pt(2.0, 0.0, &b)]);
        assert_matches!(
            result,
            Err(AlignrefTypesError::MixedCrs { index: 2, ref expected, ref found })
                if expected == "EPSG:2767" && found == "EPSG:2871"
        );
    }

    #[test]
    fn equal_descriptors_in_distinct_allocations_are_accepted() {
        let a = crs("EPSG:2767");
        let a2 = crs("EPSG:2767");
        assert!(Polyline::open(vec![pt(0.0, 0.0, &a), pt(1.0, 0.0, &a2)]).is_ok());
    }

    #[test]
    fn iter_points_closing() {
        let c = crs("EPSG:2767");
        let open = Polyline::open(vec![pt(0.0, 0.0, &c), pt(1.0, 1.0, &c)])
            .unwrap();
        assert_eq!(open.iter_points_closing().count(), 2);

        let closed = Polyline::closed(vec![pt(0.0, 0.0, &c), pt(1.0, 1.0, &c)])
            .unwrap();
        assert_eq!(closed.iter_points_closing().count(), 3);
        assert_eq!(closed.iter_points_closing().last().unwrap(), &pt(0.0, 0.0, &c));

        let single = Polyline::closed(vec![pt(0.0, 0.0, &c)]).unwrap();
        assert_eq!(single.iter_points_closing().count(), 1);
        assert_eq!(single.iter_segments().count(), 0);
    }

    #[test]
    fn length() {
        let c = crs("EPSG:2767");
        let square = vec![
            pt(0.0, 0.0, &c),
            pt(10.0, 0.0, &c),
            pt(10.0, 10.0, &c),
            pt(0.0, 10.0, &c),
        ];
        assert_eq!(Polyline::open(square.clone()).unwrap().length(), 30.0);
        assert_eq!(Polyline::closed(square).unwrap().length(), 40.0);
    }

    #[test]
    fn base_elevation_fills_missing_z() {
        let c = crs("EPSG:2767");
        let line = Polyline::new(
            vec![SpatialPoint::new(0.0, 0.0, Some(5.0), c.clone()), pt(1.0, 0.0, &c)],
            false,
            Some(100.0),
        )
        .unwrap();

        assert_eq!(line.effective_z(0), Some(5.0));
        assert_eq!(line.effective_z(1), Some(100.0));
        assert_eq!(line.effective_z(2), None);
    }
}
