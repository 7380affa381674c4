//! Surveyed point bound to a coordinate reference system.

use std::sync::Arc;

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Point2d};
use crate::crs::CrsDescriptor;
use crate::error::AlignrefTypesError;

/// Surveyed point bound to the coordinate reference system it was declared in.
///
/// `x` and `y` are expressed in the CRS linear unit. `z` is optional and, unless it has been explicitly converted,
/// uses the same unit. The CRS is shared and never mutated through the point; transformations always produce new
/// points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialPoint {
    x: f64,
    y: f64,
    z: Option<f64>,
    crs: Arc<CrsDescriptor>,
}

impl SpatialPoint {
    /// Creates a new point.
    pub fn new(x: f64, y: f64, z: Option<f64>, crs: Arc<CrsDescriptor>) -> Self {
        Self { x, y, z, crs }
    }

    /// Creates a new point, rejecting NaN and infinite coordinates.
    pub fn try_new(
        x: f64,
        y: f64,
        z: Option<f64>,
        crs: Arc<CrsDescriptor>,
    ) -> Result<Self, AlignrefTypesError> {
        if !x.is_finite() || !y.is_finite() || z.is_some_and(|z| !z.is_finite()) {
            return Err(AlignrefTypesError::NonFiniteCoordinate {
                crs: crs.horizontal_id().to_string(),
                x,
                y,
            });
        }

        Ok(Self::new(x, y, z, crs))
    }

    /// Elevation, if any.
    pub fn z(&self) -> Option<f64> {
        self.z
    }

    /// Coordinate system the point is bound to.
    pub fn crs(&self) -> &Arc<CrsDescriptor> {
        &self.crs
    }

    /// Horizontal coordinates as a plain 2d point.
    pub fn to_point2d(&self) -> Point2d {
        Point2d::new(self.x, self.y)
    }

    /// Returns a copy of the point without elevation.
    pub fn without_z(&self) -> Self {
        Self {
            z: None,
            ..self.clone()
        }
    }
}

impl CartesianPoint2d for SpatialPoint {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl AbsDiffEq for SpatialPoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let z_eq = match (self.z, other.z) {
            (Some(a), Some(b)) => a.abs_diff_eq(&b, epsilon),
            (None, None) => true,
            _ => false,
        };

        self.crs == other.crs
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && z_eq
    }
}
