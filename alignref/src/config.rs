//! Options supplied by the surrounding application.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ReconcileError, Result};
use crate::naming::NamingScheme;
use crate::station::{parse_station, StationFormat};

/// What the renderer does with elevations. Never changes computed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationMode {
    /// Geometry is draped on the terrain, elevations are not rendered.
    #[default]
    ClampToGround,
    /// Reconciled elevations are rendered as they are.
    Absolute,
}

impl ElevationMode {
    /// Elevation handed to the renderer for a reconciled elevation `z`.
    pub fn output_elevation(&self, z: Option<f64>) -> Option<f64> {
        match self {
            ElevationMode::ClampToGround => None,
            ElevationMode::Absolute => z,
        }
    }
}

/// Alignment processing options.
///
/// Stations can be given as numbers (`30000.0`) or as station strings (`"300+00"`).
///
/// ```
/// use alignref::config::AlignmentConfig;
/// use alignref::naming::NamingScheme;
///
/// let config = AlignmentConfig::from_json(
///     r#"{ "start_station": "300+00", "end_station": 30872, "naming_scheme": "station" }"#,
/// ).unwrap();
/// assert_eq!(config.start_station, Some(30000.0));
/// assert_eq!(config.naming_scheme, NamingScheme::Station);
/// assert_eq!(config.station_tolerance, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Station of the first point. Required for station output.
    #[serde(deserialize_with = "deserialize_station")]
    pub start_station: Option<f64>,
    /// Expected station of the last point, used for validation only.
    #[serde(deserialize_with = "deserialize_station")]
    pub end_station: Option<f64>,
    /// Allowed difference between measured length and station range, in the unit of the stations.
    pub station_tolerance: f64,
    /// Labeling scheme.
    pub naming_scheme: NamingScheme,
    /// What the renderer does with elevations.
    pub elevation_mode: ElevationMode,
    /// Station string layout. Checked by [`StationFormat::new`] when deserialized.
    pub station_format: StationFormat,
    /// Prefix for [`NamingScheme::Prefixed`] labels.
    pub label_prefix: String,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            start_station: None,
            end_station: None,
            station_tolerance: 1.0,
            naming_scheme: NamingScheme::default(),
            elevation_mode: ElevationMode::default(),
            station_format: StationFormat::default(),
            label_prefix: String::new(),
        }
    }
}

impl AlignmentConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| ReconcileError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the options are consistent.
    ///
    /// Fails with [`ReconcileError::MissingStationData`] (with index 0) when station labels are requested without a
    /// start station.
    pub fn validate(&self) -> Result<()> {
        if !self.station_tolerance.is_finite() || self.station_tolerance < 0.0 {
            return Err(ReconcileError::InvalidConfig(format!(
                "station tolerance must be a non-negative number, got {}",
                self.station_tolerance
            )));
        }

        for (name, value) in [("start", self.start_station), ("end", self.end_station)] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ReconcileError::InvalidConfig(format!(
                    "{name} station must be finite, got {value}"
                )));
            }
        }

        if self.start_station.is_none() {
            if self.naming_scheme == NamingScheme::Station {
                return Err(ReconcileError::MissingStationData {
                    index: 0,
                    reason: "station naming requires a start station".into(),
                });
            }
            if let Some(end) = self.end_station {
                return Err(ReconcileError::InvalidConfig(format!(
                    "end station {end} is given without a start station"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StationInput {
    Number(f64),
    Text(String),
}

fn deserialize_station<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    match Option::<StationInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StationInput::Number(value)) => Ok(Some(value)),
        Some(StationInput::Text(text)) => parse_station(&text).map(Some).map_err(D::Error::custom),
    }
}
