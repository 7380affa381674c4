//! Geographic coordinates (latitude and longitude) (see [`GeoPoint2d`]), conversion between geographic and
//! projected coordinates (see [`Projection`]) and ellipsoid geodesics (see [`Datum`]).

mod datum;
mod point;
mod projection;

#[cfg(feature = "geodesy")]
mod geodesy;

pub use datum::Datum;
pub use point::GeoPoint2d;
pub use projection::{ChainProjection, InvertedProjection, Projection};

#[cfg(feature = "geodesy")]
pub use self::geodesy::GeodesyProjection;
