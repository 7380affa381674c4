//! Elevation policy.
//!
//! Decides what happens to an elevation value when geometry moves from one CRS to another. The policy never
//! performs a vertical datum transformation: it either leaves the value alone, converts its unit, or refuses.
//!
//! | from           | to                        | action                                   |
//! |----------------|---------------------------|------------------------------------------|
//! | none           | none                      | unit conversion, value stays opaque      |
//! | none           | orthometric / ellipsoidal | [`ReconcileError::AmbiguousVerticalSemantics`] |
//! | orthometric    | orthometric, same datum   | unit conversion                          |
//! | ellipsoidal    | ellipsoidal, same datum   | unit conversion                          |
//! | any with datum | same kind, other datum    | [`ReconcileError::UnsupportedVerticalDatumShift`] |
//! | orthometric    | ellipsoidal (and reverse) | [`ReconcileError::UnsupportedVerticalDatumShift`] |
//! | any with datum | none                      | unit conversion, value becomes opaque    |

use alignref_types::{CrsDescriptor, VerticalKind};
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

/// What the policy does to an elevation value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "factor", rename_all = "snake_case")]
pub enum ElevationAction {
    /// Value is passed through untouched.
    Unchanged,
    /// Value is multiplied by the unit conversion factor.
    Scale(f64),
}

impl ElevationAction {
    /// Applies the action to a value.
    pub fn apply(&self, z: f64) -> f64 {
        match self {
            ElevationAction::Unchanged => z,
            ElevationAction::Scale(factor) => z * factor,
        }
    }
}

/// Decides how an elevation `z` declared in `from` is expressed in `to`.
///
/// `z` is only used to enrich error messages.
pub fn plan_elevation(z: f64, from: &CrsDescriptor, to: &CrsDescriptor) -> Result<ElevationAction> {
    use VerticalKind::*;

    match (from.vertical_kind(), to.vertical_kind()) {
        (None, Orthometric | Ellipsoidal) => {
            return Err(ReconcileError::AmbiguousVerticalSemantics {
                from: from.horizontal_id().to_string(),
                to: to.horizontal_id().to_string(),
                to_kind: to.vertical_kind(),
                to_datum: to.vertical_datum_tag().to_string(),
                z,
            });
        }
        (Orthometric, Orthometric) | (Ellipsoidal, Ellipsoidal)
            if from.vertical_datum_tag() != to.vertical_datum_tag() =>
        {
            return Err(datum_shift(z, from, to));
        }
        (Orthometric, Ellipsoidal) | (Ellipsoidal, Orthometric) => {
            return Err(datum_shift(z, from, to));
        }
        _ => {}
    }

    let factor = from.linear_unit().factor_to(to.linear_unit());
    Ok(if factor == 1.0 {
        ElevationAction::Unchanged
    } else {
        ElevationAction::Scale(factor)
    })
}

/// Expresses elevation `z` declared in `from` in the vertical reference and unit of `to`.
pub fn reconcile_elevation(z: f64, from: &CrsDescriptor, to: &CrsDescriptor) -> Result<f64> {
    Ok(plan_elevation(z, from, to)?.apply(z))
}

fn datum_shift(z: f64, from: &CrsDescriptor, to: &CrsDescriptor) -> ReconcileError {
    ReconcileError::UnsupportedVerticalDatumShift {
        from: from.horizontal_id().to_string(),
        to: to.horizontal_id().to_string(),
        from_kind: from.vertical_kind(),
        from_datum: from.vertical_datum_tag().to_string(),
        to_kind: to.vertical_kind(),
        to_datum: to.vertical_datum_tag().to_string(),
        z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alignref_types::{LinearUnit, VerticalReference};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn crs(unit: LinearUnit, vertical: VerticalReference) -> CrsDescriptor {
        CrsDescriptor::new("EPSG:0000", unit, vertical)
    }

    fn navd88() -> VerticalReference {
        VerticalReference::Orthometric("NAVD88".into())
    }

    fn any_unit() -> impl Strategy<Value = LinearUnit> {
        prop_oneof![
            Just(LinearUnit::Meter),
            Just(LinearUnit::UsSurveyFoot),
            Just(LinearUnit::InternationalFoot),
        ]
    }

    #[test]
    fn bare_scalar_is_unit_converted() {
        let from = crs(LinearUnit::UsSurveyFoot, VerticalReference::None);
        let to = crs(LinearUnit::Meter, VerticalReference::None);
        assert_relative_eq!(
            reconcile_elevation(2235.97, &from, &to).unwrap(),
            681.525019,
            max_relative = 1e-8
        );
    }

    #[test]
    fn same_unit_is_untouched() {
        let from = crs(LinearUnit::Meter, navd88());
        assert_eq!(
            plan_elevation(696.52, &from, &from).unwrap(),
            ElevationAction::Unchanged
        );
        assert_eq!(reconcile_elevation(696.52, &from, &from).unwrap(), 696.52);
    }

    #[test]
    fn undeclared_datum_cannot_be_promoted() {
        let from = crs(LinearUnit::Meter, VerticalReference::None);
        let to = crs(LinearUnit::Meter, navd88());
        assert_matches!(
            reconcile_elevation(10.0, &from, &to),
            Err(ReconcileError::AmbiguousVerticalSemantics {
                to_kind: VerticalKind::Orthometric,
                ref to_datum,
                ..
            }) if to_datum == "NAVD88"
        );

        let to = crs(LinearUnit::Meter, VerticalReference::Ellipsoidal("GRS80".into()));
        assert_matches!(
            reconcile_elevation(10.0, &from, &to),
            Err(ReconcileError::AmbiguousVerticalSemantics { .. })
        );
    }

    #[test]
    fn orthometric_same_datum_converts_units() {
        let from = crs(LinearUnit::Meter, navd88());
        let to = crs(LinearUnit::UsSurveyFoot, navd88());
        assert_relative_eq!(
            reconcile_elevation(1200.0, &from, &to).unwrap(),
            3937.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn orthometric_datum_change_is_refused() {
        let from = crs(LinearUnit::Meter, navd88());
        let to = crs(LinearUnit::Meter, VerticalReference::Orthometric("NGVD29".into()));
        assert_matches!(
            reconcile_elevation(10.0, &from, &to),
            Err(ReconcileError::UnsupportedVerticalDatumShift { ref from_datum, ref to_datum, .. })
                if from_datum == "NAVD88" && to_datum == "NGVD29"
        );
    }

    #[test]
    fn orthometric_to_ellipsoidal_is_refused() {
        let from = crs(LinearUnit::Meter, navd88());
        let to = crs(LinearUnit::Meter, VerticalReference::Ellipsoidal("NAVD88".into()));
        assert_matches!(
            reconcile_elevation(10.0, &from, &to),
            Err(ReconcileError::UnsupportedVerticalDatumShift {
                from_kind: VerticalKind::Orthometric,
                to_kind: VerticalKind::Ellipsoidal,
                ..
            })
        );
        assert_matches!(
            reconcile_elevation(10.0, &to, &from),
            Err(ReconcileError::UnsupportedVerticalDatumShift {
                from_kind: VerticalKind::Ellipsoidal,
                to_kind: VerticalKind::Orthometric,
                ..
            })
        );
    }

    #[test]
    fn dropping_datum_keeps_value() {
        let from = crs(LinearUnit::Meter, navd88());
        let to = crs(LinearUnit::Meter, VerticalReference::None);
        assert_eq!(reconcile_elevation(42.0, &from, &to).unwrap(), 42.0);
    }

    proptest! {
        #[test]
        fn horizontal_only_elevation_is_pure_scaling(
            from_unit in any_unit(),
            to_unit in any_unit(),
            z in -10_000.0f64..10_000.0,
        ) {
            let from = crs(from_unit, VerticalReference::None);
            let to = crs(to_unit, VerticalReference::None);
            let expected = z * (from_unit.to_meters() / to_unit.to_meters());

            let action = plan_elevation(z, &from, &to).unwrap();
            prop_assert!(matches!(action, ElevationAction::Unchanged | ElevationAction::Scale(_)));

            let actual = reconcile_elevation(z, &from, &to).unwrap();
            prop_assert!((actual - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }

        #[test]
        fn unit_round_trip(
            a in any_unit(),
            b in any_unit(),
            z in -10_000.0f64..10_000.0,
        ) {
            let crs_a = crs(a, navd88());
            let crs_b = crs(b, navd88());
            let there = reconcile_elevation(z, &crs_a, &crs_b).unwrap();
            let back = reconcile_elevation(there, &crs_b, &crs_a).unwrap();
            prop_assert!((back - z).abs() <= 1e-9 * z.abs().max(1.0));
        }
    }
}
