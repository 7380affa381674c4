//! Data model shared by the alignref engine: coordinate reference system descriptors, surveyed geometries bound to
//! them and the projection traits used to move horizontal coordinates between systems.
//!
//! Every coordinate in this crate is created already bound to a [`CrsDescriptor`]. There is no way to build a
//! [`SpatialPoint`] or a [`Polyline`] without one, which keeps unit and datum assumptions explicit at every call
//! boundary.
//!
//! ```
//! use std::sync::Arc;
//! use alignref_types::{CrsDescriptor, LinearUnit, SpatialPoint, VerticalReference};
//!
//! let crs = Arc::new(CrsDescriptor::new(
//!     "EPSG:2871",
//!     LinearUnit::UsSurveyFoot,
//!     VerticalReference::None,
//! ));
//! let point = SpatialPoint::new(6829001.34, 2187051.01, Some(2235.97), crs);
//! assert_eq!(point.crs().horizontal_id(), "EPSG:2871");
//! ```

pub mod cartesian;
pub mod crs;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod polyline;
pub mod segment;
pub mod spatial_point;
pub mod units;

pub use cartesian::{CartesianPoint2d, CartesianPoint2dFloat, Point2d};
pub use crs::{CrsDescriptor, VerticalKind, VerticalReference};
pub use error::AlignrefTypesError;
pub use geometry::{Geometry, GeometryKind};
pub use polyline::Polyline;
pub use segment::Segment;
pub use spatial_point::SpatialPoint;
pub use units::LinearUnit;
