//! Coordinate reconciliation and linear referencing for surveyed alignments.
//!
//! The engine takes points and polylines bound to a [`CrsDescriptor`](alignref_types::CrsDescriptor) and
//!
//! * moves their horizontal coordinates into a target CRS through an injected
//!   [`HorizontalTransform`](transform::HorizontalTransform),
//! * converts or preserves elevations according to an explicit [elevation policy](elevation), refusing anything
//!   that would need a vertical datum transformation,
//! * computes civil engineering stations along the ordered result ([`station`]),
//! * assigns labels ([`naming`]).
//!
//! [`AlignmentPipeline`](pipeline::AlignmentPipeline) chains all of these.
//!
//! ```
//! use std::sync::Arc;
//! use alignref::alignref_types::{CartesianPoint2d, CrsDescriptor, LinearUnit, SpatialPoint};
//! use alignref::{GridRegistry, Reconciler};
//!
//! let registry = GridRegistry::california_zone2().unwrap();
//! let feet = Arc::new(CrsDescriptor::horizontal("EPSG:2871", LinearUnit::UsSurveyFoot));
//! let meters = Arc::new(CrsDescriptor::horizontal("EPSG:2767", LinearUnit::Meter));
//!
//! let point = SpatialPoint::new(6829001.34, 2187051.01, None, feet);
//! let reconciled = Reconciler::new(registry).reconcile(&point.into(), &meters).unwrap();
//! assert!((reconciled.geometry().anchor().x() - 2081483.77).abs() < 0.01);
//! ```

pub mod config;
pub mod elevation;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod reconciler;
pub mod station;
pub mod transform;

pub use config::{AlignmentConfig, ElevationMode};
pub use error::{ReconcileError, Result};
pub use naming::NamingScheme;
pub use pipeline::{AlignmentOutput, AlignmentPipeline};
pub use reconciler::{EntityReport, ReconciledGeometry, Reconciler};
pub use station::{StationAssignment, StationFormat, StationPoint, StationRun, StationValidation};
pub use transform::{GridRegistry, HorizontalTransform};

pub use alignref_types;
