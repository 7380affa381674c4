//! Human readable labels for reconciled entities.

use alignref_types::{CartesianPoint2d, Geometry, GeometryKind};
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};
use crate::station::StationAssignment;

/// Labeling scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// `Point 3`, `Polyline 3`.
    #[default]
    Sequential,
    /// `Sta 300+48.77`. Requires a station assignment.
    Station,
    /// `E 2081471.89 N 666616.08`.
    Coordinate,
    /// `{prefix}-003`, usually with the source file stem as the prefix.
    Prefixed,
}

/// The part of a geometry that labels can depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySummary {
    /// Geometry kind.
    pub kind: GeometryKind,
    /// Easting of the anchor point (the first vertex of a polyline).
    pub x: f64,
    /// Northing of the anchor point.
    pub y: f64,
}

impl From<&Geometry> for GeometrySummary {
    fn from(geometry: &Geometry) -> Self {
        let anchor = geometry.anchor();
        Self {
            kind: geometry.kind(),
            x: anchor.x(),
            y: anchor.y(),
        }
    }
}

/// Creates the label of the entity at `index` (0 based).
///
/// `prefix` is only used by [`NamingScheme::Prefixed`]; an empty prefix falls back to the sequential label.
/// Fails with [`ReconcileError::MissingStationData`] if the station scheme is requested without a station.
pub fn label(
    index: usize,
    station: Option<&StationAssignment>,
    summary: &GeometrySummary,
    scheme: NamingScheme,
    prefix: &str,
) -> Result<String> {
    let number = index + 1;
    Ok(match scheme {
        NamingScheme::Sequential => format!("{} {number}", summary.kind),
        NamingScheme::Station => {
            let station = station.ok_or_else(|| ReconcileError::MissingStationData {
                index,
                reason: "station naming requires a start station".into(),
            })?;
            format!("Sta {}", station.formatted())
        }
        NamingScheme::Coordinate => format!("E {:.2} N {:.2}", summary.x, summary.y),
        NamingScheme::Prefixed if prefix.is_empty() => format!("{} {number}", summary.kind),
        NamingScheme::Prefixed => format!("{prefix}-{number:03}"),
    })
}
