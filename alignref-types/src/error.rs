//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignrefTypesError {
    /// A polyline was created without any vertices.
    #[error("polyline must have at least one vertex")]
    EmptyPolyline,
    /// Vertices of a polyline are bound to different coordinate systems.
    #[error(
        "polyline vertex {index} is bound to {found}, but the polyline is bound to {expected}"
    )]
    MixedCrs {
        /// Index of the first offending vertex.
        index: usize,
        /// Horizontal id of the polyline CRS (taken from the first vertex).
        expected: String,
        /// Horizontal id of the offending vertex CRS.
        found: String,
    },
    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate ({x}, {y}) in {crs}")]
    NonFiniteCoordinate {
        /// Horizontal id of the owning CRS.
        crs: String,
        /// X value as received.
        x: f64,
        /// Y value as received.
        y: f64,
    },
    /// Linear unit name could not be recognized.
    #[error("unknown linear unit: {0}")]
    UnknownUnit(String),
}
