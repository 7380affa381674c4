//! Coordinate reference system descriptors.
//!
//! A [`CrsDescriptor`] is an immutable value describing three independent things:
//!
//! * the horizontal reference (an opaque identifier such as `EPSG:2871`),
//! * the linear unit of the horizontal coordinates and of any bare elevation,
//! * the vertical semantics of elevations ([`VerticalReference`]).
//!
//! A descriptor with [`VerticalReference::None`] describes a purely 2D horizontal system. Elevations attached to
//! geometries in such a system are opaque scalars in the descriptor's linear unit and are never interpreted as
//! ellipsoidal heights.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::units::LinearUnit;

/// Kind of vertical component declared by a CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalKind {
    /// No vertical component is declared.
    None,
    /// Height above a gravity-based surface (geoid).
    Orthometric,
    /// Height above the reference ellipsoid.
    Ellipsoidal,
}

impl Display for VerticalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            VerticalKind::None => "none",
            VerticalKind::Orthometric => "orthometric",
            VerticalKind::Ellipsoidal => "ellipsoidal",
        })
    }
}

/// Vertical semantics of a CRS together with the datum it refers to.
///
/// The datum tag only exists for the kinds that need one, so a 2D system can never carry a stray datum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "datum", rename_all = "snake_case")]
pub enum VerticalReference {
    /// No vertical component.
    None,
    /// Orthometric heights relative to the named vertical datum (e.g. `NAVD88`).
    Orthometric(String),
    /// Ellipsoidal heights relative to the named ellipsoid/datum (e.g. `GRS80`).
    Ellipsoidal(String),
}

impl VerticalReference {
    /// Kind of the vertical component.
    pub fn kind(&self) -> VerticalKind {
        match self {
            VerticalReference::None => VerticalKind::None,
            VerticalReference::Orthometric(_) => VerticalKind::Orthometric,
            VerticalReference::Ellipsoidal(_) => VerticalKind::Ellipsoidal,
        }
    }

    /// Datum tag, empty for [`VerticalReference::None`].
    pub fn datum_tag(&self) -> &str {
        match self {
            VerticalReference::None => "",
            VerticalReference::Orthometric(tag) | VerticalReference::Ellipsoidal(tag) => tag,
        }
    }
}

impl Display for VerticalReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VerticalReference::None => write!(f, "none"),
            VerticalReference::Orthometric(tag) => write!(f, "orthometric({tag})"),
            VerticalReference::Ellipsoidal(tag) => write!(f, "ellipsoidal({tag})"),
        }
    }
}

/// Immutable description of a coordinate reference system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrsDescriptor {
    horizontal_id: String,
    linear_unit: LinearUnit,
    vertical: VerticalReference,
}

impl CrsDescriptor {
    /// Creates a new descriptor.
    pub fn new(
        horizontal_id: impl Into<String>,
        linear_unit: LinearUnit,
        vertical: VerticalReference,
    ) -> Self {
        Self {
            horizontal_id: horizontal_id.into(),
            linear_unit,
            vertical,
        }
    }

    /// Creates a purely horizontal (2D) descriptor.
    pub fn horizontal(horizontal_id: impl Into<String>, linear_unit: LinearUnit) -> Self {
        Self::new(horizontal_id, linear_unit, VerticalReference::None)
    }

    /// Returns a copy of this descriptor with a different vertical reference.
    pub fn with_vertical(&self, vertical: VerticalReference) -> Self {
        Self {
            vertical,
            ..self.clone()
        }
    }

    /// Identifier of the horizontal reference system.
    pub fn horizontal_id(&self) -> &str {
        &self.horizontal_id
    }

    /// Linear unit of horizontal coordinates (and of bare elevations).
    pub fn linear_unit(&self) -> LinearUnit {
        self.linear_unit
    }

    /// Vertical reference of elevations.
    pub fn vertical(&self) -> &VerticalReference {
        &self.vertical
    }

    /// Kind of vertical component.
    pub fn vertical_kind(&self) -> VerticalKind {
        self.vertical.kind()
    }

    /// Vertical datum tag, empty if the CRS has no vertical component.
    pub fn vertical_datum_tag(&self) -> &str {
        self.vertical.datum_tag()
    }

    /// Returns true if the CRS declares no vertical component.
    pub fn is_horizontal_only(&self) -> bool {
        self.vertical == VerticalReference::None
    }

    /// Returns true if both descriptors share the horizontal reference and the linear unit, so that horizontal
    /// coordinates can be passed between them unchanged.
    pub fn same_horizontal(&self, other: &CrsDescriptor) -> bool {
        self.horizontal_id == other.horizontal_id && self.linear_unit == other.linear_unit
    }
}

impl Display for CrsDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}, vertical: {}]",
            self.horizontal_id, self.linear_unit, self.vertical
        )
    }
}
