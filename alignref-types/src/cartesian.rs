//! Traits for points in 2d cartesian (projected) space.
//!
//! All distance helpers are plain planar Euclidean values in whatever unit the points are expressed in. Mixing
//! points from different coordinate systems through these traits is the caller's responsibility to avoid.

use nalgebra::{Point2, Scalar, Vector2};
use num_traits::{Bounded, Float, FromPrimitive, Num};

/// 2d point with owned coordinates.
pub type Point2d = Point2<f64>;

/// Point in 2d cartesian coordinate space.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive;

    /// X coordinate (easting).
    fn x(&self) -> Self::Num;
    /// Y coordinate (northing).
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates are exactly equal.
    fn equal(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }

    /// Vector from `other` to `self`.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared euclidean distance.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let v = self.sub(other);
        v.x * v.x + v.y * v.y
    }
}

/// Distance helpers for floating point coordinates.
pub trait CartesianPoint2dFloat<N: Float = f64>: CartesianPoint2d<Num = N> {
    /// Euclidean distance between the points.
    fn distance(&self, other: &impl CartesianPoint2d<Num = N>) -> N {
        self.distance_sq(other).sqrt()
    }
}

impl<N: Float, T: CartesianPoint2d<Num = N>> CartesianPoint2dFloat<N> for T {}

impl<Num: num_traits::Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> CartesianPoint2d
    for Point2<Num>
{
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }

    fn y(&self) -> Num {
        self.y
    }
}

impl<T: CartesianPoint2d> CartesianPoint2d for &T {
    type Num = T::Num;

    fn x(&self) -> Self::Num {
        (*self).x()
    }

    fn y(&self) -> Self::Num {
        (*self).y()
    }
}
