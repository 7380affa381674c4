//! Error types used by the crate.

use alignref_types::{AlignrefTypesError, VerticalKind};
use thiserror::Error;

/// Result alias with [`ReconcileError`] as the default error.
pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;

/// Reconciliation error.
///
/// Every variant carries the CRS identifiers, datum tags and numeric values needed to diagnose the failure
/// without access to the input data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconcileError {
    /// No transformation path between the horizontal references is known.
    #[error("no horizontal transformation path from {from} to {to}: {reason}")]
    UnsupportedCrsPair {
        /// Source horizontal id.
        from: String,
        /// Target horizontal id.
        to: String,
        /// What is missing.
        reason: String,
    },
    /// A known transformation path failed for this coordinate pair.
    #[error("projection from {from} to {to} failed for ({x}, {y})")]
    ProjectionFailed {
        /// Source horizontal id.
        from: String,
        /// Target horizontal id.
        to: String,
        /// Input x.
        x: f64,
        /// Input y.
        y: f64,
    },
    /// The source CRS declares no vertical datum, but the target requires one.
    #[error(
        "elevation {z} in {from} has no declared vertical datum and cannot be assigned {to_kind} datum '{to_datum}' of {to}"
    )]
    AmbiguousVerticalSemantics {
        /// Source horizontal id.
        from: String,
        /// Target horizontal id.
        to: String,
        /// Target vertical kind.
        to_kind: VerticalKind,
        /// Target vertical datum tag.
        to_datum: String,
        /// Offending elevation value.
        z: f64,
    },
    /// Converting the elevation would require a vertical datum transformation.
    #[error(
        "elevation {z} needs a vertical datum shift from {from_kind} '{from_datum}' ({from}) to {to_kind} '{to_datum}' ({to}), which is not supported"
    )]
    UnsupportedVerticalDatumShift {
        /// Source horizontal id.
        from: String,
        /// Target horizontal id.
        to: String,
        /// Source vertical kind.
        from_kind: VerticalKind,
        /// Source vertical datum tag.
        from_datum: String,
        /// Target vertical kind.
        to_kind: VerticalKind,
        /// Target vertical datum tag.
        to_datum: String,
        /// Offending elevation value.
        z: f64,
    },
    /// Station based output was requested without station data.
    #[error("station data is missing for entity {index}: {reason}")]
    MissingStationData {
        /// Index of the entity that needed a station.
        index: usize,
        /// What is missing.
        reason: String,
    },
    /// Stations were requested, but no planar coordinate system is available to measure them in.
    #[error("stations cannot be measured in geographic coordinates of {crs}: {reason}")]
    GeographicStations {
        /// Horizontal id of the geographic system.
        crs: String,
        /// Why no planar system could be used instead.
        reason: String,
    },
    /// Configuration value is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Input geometry is invalid.
    #[error(transparent)]
    Geometry(#[from] AlignrefTypesError),
}

impl ReconcileError {
    /// Returns true if the error only concerns the elevation component, so that the horizontal part of the
    /// geometry could still be reconciled.
    pub fn is_elevation_error(&self) -> bool {
        matches!(
            self,
            ReconcileError::AmbiguousVerticalSemantics { .. }
                | ReconcileError::UnsupportedVerticalDatumShift { .. }
        )
    }
}
