//! Linear units of measure used by projected coordinate systems and elevations.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlignrefTypesError;

/// Linear unit with an exact conversion factor to meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearUnit {
    /// SI meter.
    Meter,
    /// US survey foot, exactly 1200/3937 m.
    UsSurveyFoot,
    /// International foot, exactly 0.3048 m.
    InternationalFoot,
}

impl LinearUnit {
    /// Length of one unit in meters.
    pub fn to_meters(&self) -> f64 {
        match self {
            LinearUnit::Meter => 1.0,
            LinearUnit::UsSurveyFoot => 1200.0 / 3937.0,
            LinearUnit::InternationalFoot => 0.3048,
        }
    }

    /// Factor that converts a value expressed in `self` into a value expressed in `target`.
    ///
    /// Returns exactly `1.0` for equal units, so that converting in place never loses precision.
    pub fn factor_to(&self, target: LinearUnit) -> f64 {
        if *self == target {
            1.0
        } else {
            self.to_meters() / target.to_meters()
        }
    }

    /// Converts `value` expressed in `self` into `target` units.
    pub fn convert(&self, value: f64, target: LinearUnit) -> f64 {
        if *self == target {
            value
        } else {
            value * self.factor_to(target)
        }
    }

    /// Short symbol used in reports.
    pub fn symbol(&self) -> &'static str {
        match self {
            LinearUnit::Meter => "m",
            LinearUnit::UsSurveyFoot => "ftUS",
            LinearUnit::InternationalFoot => "ft",
        }
    }
}

impl Display for LinearUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LinearUnit {
    type Err = AlignrefTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "metre" | "meters" | "metres" => Ok(LinearUnit::Meter),
            "ftus" | "us_ft" | "us-ft" | "us_survey_foot" | "us survey foot" => {
                Ok(LinearUnit::UsSurveyFoot)
            }
            "ft" | "foot" | "feet" | "international_foot" | "international foot" => {
                Ok(LinearUnit::InternationalFoot)
            }
            _ => Err(AlignrefTypesError::UnknownUnit(s.to_string())),
        }
    }
}
