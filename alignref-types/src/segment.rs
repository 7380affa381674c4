//! Straight segment between two consecutive vertices.

use num_traits::Float;

use crate::cartesian::{CartesianPoint2d, CartesianPoint2dFloat};

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<P: CartesianPoint2d> Segment<'_, P>
where
    P::Num: Float,
{
    /// Planar length of the segment.
    pub fn length(&self) -> P::Num {
        self.0.distance(self.1)
    }

    /// Returns true if both ends of the segment coincide.
    pub fn is_degenerate(&self) -> bool {
        self.0.equal(self.1)
    }
}
