//! Linear referencing: cumulative distances along an ordered point sequence expressed as civil engineering
//! stations.

use std::fmt::{Display, Formatter};

use alignref_types::{
    CartesianPoint2d, CartesianPoint2dFloat, Point2d, Polyline, Segment, SpatialPoint,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

/// Layout of a station string such as `300+48.77`.
///
/// The value is split into the number of whole `interval`s and the remainder. The remainder is zero padded to
/// `remainder_digits` integer digits and printed with `decimals` fractional digits. The interval is always
/// `10^remainder_digits`, so every formatted station parses back with [`parse_station`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StationFormatParts")]
pub struct StationFormat {
    interval: u32,
    remainder_digits: usize,
    decimals: usize,
}

impl StationFormat {
    /// Largest supported number of fractional digits.
    pub const MAX_DECIMALS: usize = 9;

    /// Stations every 100 units: `300+48.77`.
    pub const IMPERIAL: Self = Self {
        interval: 100,
        remainder_digits: 2,
        decimals: 2,
    };

    /// Stations every 1000 units: `0+032.67`.
    pub const METRIC: Self = Self {
        interval: 1000,
        remainder_digits: 3,
        decimals: 2,
    };

    /// Creates a custom format.
    ///
    /// Fails with [`ReconcileError::InvalidConfig`] unless `interval` is `10^remainder_digits` (1 to 10^9) and
    /// `decimals` is at most [`MAX_DECIMALS`](Self::MAX_DECIMALS).
    pub fn new(interval: u32, remainder_digits: usize, decimals: usize) -> Result<Self> {
        let expected = u32::try_from(remainder_digits)
            .ok()
            .and_then(|digits| 10u32.checked_pow(digits));
        if remainder_digits == 0 || expected != Some(interval) {
            return Err(ReconcileError::InvalidConfig(format!(
                "station interval {interval} does not match {remainder_digits} remainder digits, \
                 expected a power of ten between 10 and 10^9 with as many zeros as remainder digits"
            )));
        }

        if decimals > Self::MAX_DECIMALS {
            return Err(ReconcileError::InvalidConfig(format!(
                "station decimals must be at most {}, got {decimals}",
                Self::MAX_DECIMALS
            )));
        }

        Ok(Self {
            interval,
            remainder_digits,
            decimals,
        })
    }

    /// Distance between two full stations.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Integer digits of the remainder.
    pub fn remainder_digits(&self) -> usize {
        self.remainder_digits
    }

    /// Fractional digits of the remainder.
    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Formats a station value.
    ///
    /// The value is rounded to `decimals` before it is split, so `99.996` becomes `1+00.00` rather than `0+100.00`.
    pub fn format(&self, value: f64) -> String {
        let scale = 10f64.powi(self.decimals as i32);
        let rounded = (value.abs() * scale).round();
        let interval = self.interval as f64 * scale;

        let major = (rounded / interval).floor();
        let remainder = (rounded - major * interval) / scale;

        let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
        let width = if self.decimals > 0 {
            self.remainder_digits + 1 + self.decimals
        } else {
            self.remainder_digits
        };

        format!(
            "{sign}{major:.0}+{remainder:0width$.prec$}",
            prec = self.decimals
        )
    }
}

#[derive(Deserialize)]
struct StationFormatParts {
    interval: u32,
    remainder_digits: usize,
    decimals: usize,
}

impl TryFrom<StationFormatParts> for StationFormat {
    type Error = ReconcileError;

    fn try_from(value: StationFormatParts) -> Result<Self> {
        Self::new(value.interval, value.remainder_digits, value.decimals)
    }
}

impl Default for StationFormat {
    fn default() -> Self {
        Self::IMPERIAL
    }
}

/// Formats a station value with the [imperial](StationFormat::IMPERIAL) layout.
pub fn format_station(value: f64) -> String {
    StationFormat::IMPERIAL.format(value)
}

/// Parses a station string (`300+48.77`, `0+032.67`, `-1+50.00`) or a plain number (`30048.77`).
///
/// The interval is taken from the number of integer digits of the remainder: two digits mean stations every 100
/// units, three digits every 1000.
pub fn parse_station(input: &str) -> Result<f64> {
    let invalid = || ReconcileError::InvalidConfig(format!("invalid station value '{input}'"));
    let trimmed = input.trim();

    let Some((major, remainder)) = trimmed.split_once('+') else {
        return trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(invalid);
    };

    let (negative, major) = match major.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, major),
    };
    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let integer_digits = remainder.split('.').next().map_or(0, str::len);
    if integer_digits == 0 || !remainder.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(invalid());
    }

    let interval = 10f64.powi(integer_digits as i32);
    let major: f64 = major.parse().map_err(|_| invalid())?;
    let remainder: f64 = remainder.parse().map_err(|_| invalid())?;

    let value = major * interval + remainder;
    Ok(if negative { -value } else { value })
}

/// Point that can be stationed.
///
/// Only the horizontal position is used for distances. The elevation is carried along so that
/// [`StationRun::locate`] can interpolate it.
pub trait StationPoint: CartesianPoint2d<Num = f64> {
    /// Elevation of the point, if known.
    fn elevation(&self) -> Option<f64> {
        None
    }
}

impl StationPoint for Point2d {}

impl StationPoint for SpatialPoint {
    fn elevation(&self) -> Option<f64> {
        self.z()
    }
}

impl<T: StationPoint> StationPoint for &T {
    fn elevation(&self) -> Option<f64> {
        (*self).elevation()
    }
}

/// Station of a single point of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAssignment {
    index: usize,
    start_station: f64,
    segment_length: f64,
    cumulative_distance: f64,
    station_value: f64,
    formatted: String,
}

impl StationAssignment {
    /// Position of the point in the sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Station of the first point.
    pub fn start_station(&self) -> f64 {
        self.start_station
    }

    /// Distance from the previous point, 0 for the first one.
    pub fn segment_length(&self) -> f64 {
        self.segment_length
    }

    /// Distance from the first point along the sequence.
    pub fn cumulative_distance(&self) -> f64 {
        self.cumulative_distance
    }

    /// `start_station + cumulative_distance`.
    pub fn station_value(&self) -> f64 {
        self.station_value
    }

    /// Station string, e.g. `300+48.77`.
    pub fn formatted(&self) -> &str {
        &self.formatted
    }
}

/// Measured length does not match the supplied station range.
///
/// This is a data quality signal, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMismatchWarning {
    /// Start station.
    pub start_station: f64,
    /// End station.
    pub end_station: f64,
    /// `end_station - start_station`.
    pub expected_length: f64,
    /// Total distance along the points.
    pub measured_length: f64,
    /// Absolute difference between expected and measured length.
    pub discrepancy: f64,
    /// Tolerance that was exceeded.
    pub tolerance: f64,
}

impl Display for StationMismatchWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "measured length {:.2} does not match station range {} to {} ({:.2}): discrepancy {:.2} exceeds tolerance {}",
            self.measured_length,
            format_station(self.start_station),
            format_station(self.end_station),
            self.expected_length,
            self.discrepancy,
            self.tolerance,
        )
    }
}

/// Outcome of the end station check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StationValidation {
    /// No end station was supplied.
    NotRequested,
    /// The measured length matches the station range.
    WithinTolerance {
        /// Absolute difference between expected and measured length.
        discrepancy: f64,
    },
    /// The measured length differs from the station range by more than the tolerance.
    Mismatch(StationMismatchWarning),
    /// Fewer than two points, nothing to validate against.
    Degenerate {
        /// End station that could not be checked.
        end_station: f64,
    },
}

/// Stations computed for one ordered point sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRun {
    assignments: Vec<StationAssignment>,
    #[serde(skip)]
    vertices: Vec<(Point2d, Option<f64>)>,
    total_distance: f64,
    validation: StationValidation,
}

impl StationRun {
    /// One assignment per input point, in input order. Contains a single anchor assignment if fewer than two points
    /// were supplied.
    pub fn assignments(&self) -> &[StationAssignment] {
        &self.assignments
    }

    /// Sum of all segment lengths.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// End station check.
    pub fn validation(&self) -> &StationValidation {
        &self.validation
    }

    /// Mismatch warning, if any.
    pub fn warning(&self) -> Option<&StationMismatchWarning> {
        match &self.validation {
            StationValidation::Mismatch(warning) => Some(warning),
            _ => None,
        }
    }

    /// Assignment of the point at `index`.
    pub fn get(&self, index: usize) -> Option<&StationAssignment> {
        self.assignments.get(index)
    }

    /// Assignment of the last point.
    pub fn last(&self) -> Option<&StationAssignment> {
        self.assignments.last()
    }

    /// Position and elevation at `station`, interpolated linearly within the segment that contains it.
    ///
    /// The elevation is only interpolated when both ends of the segment have one. Returns `None` and logs a warning
    /// if the station lies outside the run.
    pub fn locate(&self, station: f64) -> Option<(Point2d, Option<f64>)> {
        let start = self.assignments.first()?.start_station();
        let distance = station - start;
        if !distance.is_finite()
            || distance < -LOCATE_EPSILON
            || distance > self.total_distance + LOCATE_EPSILON
        {
            warn!(
                "Station {station} is outside of the run [{start}, {}]",
                start + self.total_distance
            );
            return None;
        }

        let first = self.vertices.first()?;
        if self.vertices.len() < 2 {
            return Some(*first);
        }

        let distance = distance.clamp(0.0, self.total_distance);
        let end = self
            .assignments
            .iter()
            .skip(1)
            .position(|assignment| assignment.cumulative_distance() >= distance)
            .map_or(self.vertices.len() - 1, |position| position + 1);

        let (from, from_z) = self.vertices[end - 1];
        let (to, to_z) = self.vertices[end];
        if Segment(&from, &to).is_degenerate() {
            return Some((from, from_z));
        }

        let t = (distance - self.assignments[end - 1].cumulative_distance())
            / self.assignments[end].segment_length();
        let point = from + (to - from) * t;
        let z = match (from_z, to_z) {
            (Some(a), Some(b)) => Some(a + (b - a) * t),
            _ => None,
        };

        Some((point, z))
    }
}

const LOCATE_EPSILON: f64 = 1e-9;

/// Computes stations along `points` in the given order.
///
/// Points are neither reordered nor deduplicated. Distances are planar and in the unit of the points, so all points
/// must be in the same CRS. If `end_station` is given, the total distance is compared with
/// `end_station - start_station` and a [`StationMismatchWarning`] is produced when they differ by more than
/// `tolerance`.
pub fn compute_stations<P>(
    points: &[P],
    start_station: f64,
    end_station: Option<f64>,
    tolerance: f64,
    format: StationFormat,
) -> StationRun
where
    P: StationPoint,
{
    let assignment = |index: usize, segment_length: f64, cumulative_distance: f64| {
        let station_value = start_station + cumulative_distance;
        StationAssignment {
            index,
            start_station,
            segment_length,
            cumulative_distance,
            station_value,
            formatted: format.format(station_value),
        }
    };

    if points.len() < 2 {
        let validation = match end_station {
            Some(end_station) => {
                warn!(
                    "Cannot validate end station {} with {} point(s)",
                    format.format(end_station),
                    points.len()
                );
                StationValidation::Degenerate { end_station }
            }
            None => StationValidation::NotRequested,
        };

        return StationRun {
            assignments: vec![assignment(0, 0.0, 0.0)],
            vertices: points.iter().map(vertex).collect(),
            total_distance: 0.0,
            validation,
        };
    }

    let mut cumulative = 0.0;
    let mut assignments = Vec::with_capacity(points.len());
    assignments.push(assignment(0, 0.0, 0.0));
    for (index, pair) in points.windows(2).enumerate() {
        let segment = pair[1].distance(&pair[0]);
        cumulative += segment;
        assignments.push(assignment(index + 1, segment, cumulative));
    }

    let validation = match end_station {
        None => StationValidation::NotRequested,
        Some(end_station) => validate(start_station, end_station, cumulative, tolerance),
    };

    debug!(
        "Stations {} to {} over {} points",
        format.format(start_station),
        format.format(start_station + cumulative),
        points.len()
    );

    StationRun {
        assignments,
        vertices: points.iter().map(vertex).collect(),
        total_distance: cumulative,
        validation,
    }
}

fn vertex<P: StationPoint>(point: &P) -> (Point2d, Option<f64>) {
    (Point2d::new(point.x(), point.y()), point.elevation())
}

/// Computes stations along the vertices of a polyline. For a closed polyline the closing segment is included and
/// the first vertex gets a second assignment at the end. Vertices without an elevation take the base elevation.
pub fn stations_for_polyline(
    polyline: &Polyline,
    start_station: f64,
    end_station: Option<f64>,
    tolerance: f64,
    format: StationFormat,
) -> StationRun {
    let count = polyline.vertices().len();
    let points: Vec<SpatialPoint> = polyline
        .iter_points_closing()
        .enumerate()
        .map(|(index, point)| {
            SpatialPoint::new(
                point.x(),
                point.y(),
                polyline.effective_z(index % count),
                point.crs().clone(),
            )
        })
        .collect();
    compute_stations(&points, start_station, end_station, tolerance, format)
}

fn validate(
    start_station: f64,
    end_station: f64,
    measured: f64,
    tolerance: f64,
) -> StationValidation {
    let expected = end_station - start_station;
    let discrepancy = (measured - expected).abs();
    if discrepancy <= tolerance {
        return StationValidation::WithinTolerance { discrepancy };
    }

    let warning = StationMismatchWarning {
        start_station,
        end_station,
        expected_length: expected,
        measured_length: measured,
        discrepancy,
        tolerance,
    };
    warn!("{warning}");
    StationValidation::Mismatch(warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alignref_types::{CrsDescriptor, LinearUnit};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn along_x(distances: &[f64]) -> Vec<Point2d> {
        distances.iter().map(|&x| Point2d::new(x, 0.0)).collect()
    }

    #[test]
    fn formats_imperial() {
        assert_eq!(format_station(30048.77), "300+48.77");
        assert_eq!(format_station(30488.0), "304+88.00");
        assert_eq!(format_station(30000.0), "300+00.00");
        assert_eq!(format_station(5.5), "0+05.50");
        assert_eq!(format_station(0.0), "0+00.00");
    }

    #[test]
    fn formats_metric() {
        assert_eq!(StationFormat::METRIC.format(32.67), "0+032.67");
        assert_eq!(StationFormat::METRIC.format(1032.67), "1+032.67");
    }

    #[test]
    fn rounding_carries_into_major() {
        assert_eq!(format_station(99.996), "1+00.00");
        assert_eq!(format_station(30099.999), "301+00.00");
    }

    #[test]
    fn negative_station() {
        assert_eq!(format_station(-150.0), "-1+50.00");
        assert_eq!(format_station(-0.001), "0+00.00");
    }

    #[test]
    fn custom_format() {
        let format = StationFormat::new(10, 1, 0).unwrap();
        assert_eq!(format.format(123.4), "12+3");
        assert_abs_diff_eq!(parse_station(&format.format(123.4)).unwrap(), 123.0);

        let fine = StationFormat::new(1000, 3, StationFormat::MAX_DECIMALS)
            .unwrap();
        assert_eq!(fine.format(32.67), "0+032.670000000");
    }

    #[test]
    fn unusable_formats_are_rejected() {
        for (interval, remainder_digits, decimals) in [
            (0, 2, 2),
            (1, 0, 2),
            (100, 3, 2),
            (1000, 2, 2),
            (250, 3, 2),
            (100, 70000, 2),
            (100, usize::MAX, 2),
            (100, 2, 10),
            (100, 2, 400),
        ] {
            assert_matches!(
                StationFormat::new(interval, remainder_digits, decimals),
                Err(ReconcileError::InvalidConfig(_)),
                "{interval} {remainder_digits} {decimals}"
            );
        }
    }

    #[test]
    fn deserialized_format_is_checked() {
        let json = r#"{ "interval": 1000, "remainder_digits": 3, "decimals": 2 }"#;
        let format: StationFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format, StationFormat::METRIC);

        for json in [
            r#"{ "interval": 100, "remainder_digits": 70000, "decimals": 2 }"#,
            r#"{ "interval": 100, "remainder_digits": 2, "decimals": 400 }"#,
        ] {
            assert!(serde_json::from_str::<StationFormat>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn parses_stations() {
        assert_abs_diff_eq!(parse_station("300+48.77").unwrap(), 30048.77, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_station("0+032.67").unwrap(), 32.67, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_station("-1+50.00").unwrap(), -150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_station(" 30000 ").unwrap(), 30000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_station("300+00").unwrap(), 30000.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_invalid_stations() {
        for input in ["", "abc", "+12.00", "3a0+00.00", "300+", "300+.5", "300+4x", "NaN", "inf"] {
            assert_matches!(
                parse_station(input),
                Err(ReconcileError::InvalidConfig(_)),
                "{input}"
            );
        }
    }

    #[test]
    fn cumulative_stations() {
        let run = compute_stations(
            &along_x(&[0.0, 30.0, 70.0]),
            30000.0,
            None,
            1.0,
            StationFormat::IMPERIAL,
        );

        let values: Vec<f64> = run.assignments().iter().map(|a| a.station_value()).collect();
        assert_eq!(values, vec![30000.0, 30030.0, 30070.0]);
        assert_eq!(run.assignments()[2].segment_length(), 40.0);
        assert_eq!(run.assignments()[2].formatted(), "300+70.00");
        assert_eq!(run.total_distance(), 70.0);
        assert_eq!(run.validation(), &StationValidation::NotRequested);
    }

    #[test]
    fn final_station_of_488_feet() {
        let mut xs: Vec<f64> = (0..17).map(|i| i as f64 * 30.3).collect();
        xs.push(488.0);
        let run = compute_stations(&along_x(&xs), 30000.0, None, 1.0, StationFormat::IMPERIAL);

        let last = run.last().unwrap();
        assert_abs_diff_eq!(last.station_value(), 30488.0, epsilon = 0.01);
        assert_eq!(last.formatted(), "304+88.00");
    }

    #[test]
    fn mismatch_is_a_warning() {
        let run = compute_stations(
            &along_x(&[0.0, 488.0]),
            30000.0,
            Some(30872.0),
            1.0,
            StationFormat::IMPERIAL,
        );

        let warning = run.warning().unwrap();
        assert_abs_diff_eq!(warning.discrepancy, 384.0, epsilon = 1e-9);
        assert_abs_diff_eq!(warning.expected_length, 872.0, epsilon = 1e-9);
        assert!(warning.to_string().contains("384.00"));
        assert!(warning.to_string().contains("308+72.00"));
    }

    #[test]
    fn within_tolerance() {
        let run = compute_stations(
            &along_x(&[0.0, 488.0]),
            30000.0,
            Some(30488.5),
            1.0,
            StationFormat::IMPERIAL,
        );
        assert_matches!(
            run.validation(),
            StationValidation::WithinTolerance { discrepancy } if (*discrepancy - 0.5).abs() < 1e-9
        );
        assert!(run.warning().is_none());
    }

    #[test]
    fn single_point_is_degenerate() {
        let run = compute_stations(
            &along_x(&[5.0]),
            30000.0,
            Some(30872.0),
            1.0,
            StationFormat::IMPERIAL,
        );
        assert_eq!(run.assignments().len(), 1);
        assert_eq!(run.assignments()[0].station_value(), 30000.0);
        assert_eq!(run.total_distance(), 0.0);
        assert_eq!(
            run.validation(),
            &StationValidation::Degenerate {
                end_station: 30872.0
            }
        );
    }

    #[test]
    fn no_points_gives_anchor() {
        let run = compute_stations::<Point2d>(&[], 100.0, None, 1.0, StationFormat::IMPERIAL);
        assert_eq!(run.assignments().len(), 1);
        assert_eq!(run.assignments()[0].formatted(), "1+00.00");
    }

    #[test]
    fn duplicates_are_kept() {
        let run = compute_stations(
            &along_x(&[0.0, 10.0, 10.0, 20.0]),
            0.0,
            None,
            1.0,
            StationFormat::IMPERIAL,
        );
        assert_eq!(run.assignments().len(), 4);
        assert_eq!(run.assignments()[2].segment_length(), 0.0);
        assert_eq!(run.total_distance(), 20.0);
    }

    #[test]
    fn closed_polyline_walks_back_to_start() {
        let crs = Arc::new(CrsDescriptor::horizontal("EPSG:2767", LinearUnit::Meter));
        let square = Polyline::closed(vec![
            SpatialPoint::new(0.0, 0.0, None, crs.clone()),
            SpatialPoint::new(10.0, 0.0, None, crs.clone()),
            SpatialPoint::new(10.0, 10.0, None, crs.clone()),
            SpatialPoint::new(0.0, 10.0, None, crs),
        ])
        .unwrap();

        let run = stations_for_polyline(&square, 0.0, Some(40.0), 0.01, StationFormat::METRIC);
        assert_eq!(run.assignments().len(), 5);
        assert_eq!(run.total_distance(), 40.0);
        assert_eq!(run.last().unwrap().formatted(), "0+040.00");
        assert_matches!(run.validation(), StationValidation::WithinTolerance { .. });
    }

    #[test]
    fn locates_station_between_vertices() {
        let start = Point2d::new(2081533.5399, 666940.6437);
        let direction = Point2d::new(2081545.6180, 666982.0874) - start;
        let end = start + direction.normalize() * 43.89;

        let crs = Arc::new(CrsDescriptor::horizontal("EPSG:2767", LinearUnit::Meter));
        let points = [
            SpatialPoint::new(start.x, start.y, Some(0.0), crs.clone()),
            SpatialPoint::new(end.x, end.y, Some(10.0), crs),
        ];
        let run = compute_stations(&points, 0.0, Some(43.89), 0.01, StationFormat::METRIC);
        assert_matches!(run.validation(), StationValidation::WithinTolerance { .. });

        let station = parse_station("0+032.67").unwrap();
        let (point, z) = run.locate(station).unwrap();
        let expected = start + direction.normalize() * 32.67;
        assert_abs_diff_eq!(point.x, expected.x, epsilon = 1e-6);
        assert_abs_diff_eq!(point.y, expected.y, epsilon = 1e-6);
        assert_abs_diff_eq!(z.unwrap(), 10.0 * 32.67 / 43.89, epsilon = 1e-9);
        assert_abs_diff_eq!(point.distance(&start), 32.67, epsilon = 1e-6);
    }

    #[test]
    fn locate_outside_of_run() {
        let run = compute_stations(
            &along_x(&[0.0, 30.0, 70.0]),
            30000.0,
            None,
            1.0,
            StationFormat::IMPERIAL,
        );

        assert!(run.locate(29999.0).is_none());
        assert!(run.locate(30070.5).is_none());
        assert!(run.locate(f64::NAN).is_none());

        let (first, z) = run.locate(30000.0).unwrap();
        assert_eq!((first.x, z), (0.0, None));
        let (last, _) = run.locate(30070.0).unwrap();
        assert_abs_diff_eq!(last.x, 70.0);
        let (middle, _) = run.locate(30050.0).unwrap();
        assert_abs_diff_eq!(middle.x, 50.0, epsilon = 1e-12);
    }

    #[test]
    fn locate_skips_repeated_points() {
        let run = compute_stations(
            &along_x(&[0.0, 10.0, 10.0, 20.0]),
            0.0,
            None,
            1.0,
            StationFormat::IMPERIAL,
        );
        assert_abs_diff_eq!(run.locate(10.0).unwrap().0.x, 10.0);
        assert_abs_diff_eq!(run.locate(15.0).unwrap().0.x, 15.0);

        let single = compute_stations(&along_x(&[5.0]), 100.0, None, 1.0, StationFormat::IMPERIAL);
        assert_eq!(single.locate(100.0).unwrap().0, Point2d::new(5.0, 0.0));
        assert!(single.locate(101.0).is_none());
    }

    #[test]
    fn polyline_base_elevation_is_located() {
        let crs = Arc::new(CrsDescriptor::horizontal("EPSG:2767", LinearUnit::Meter));
        let line = Polyline::new(
            vec![
                SpatialPoint::new(0.0, 0.0, None, crs.clone()),
                SpatialPoint::new(10.0, 0.0, Some(20.0), crs),
            ],
            false,
            Some(10.0),
        )
        .unwrap();

        let run = stations_for_polyline(&line, 0.0, None, 0.01, StationFormat::METRIC);
        assert_abs_diff_eq!(run.locate(2.5).unwrap().1.unwrap(), 12.5, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn stations_never_decrease(
            coords in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..50),
            start in -1e5f64..1e5,
        ) {
            let points: Vec<Point2d> = coords.iter().map(|&(x, y)| Point2d::new(x, y)).collect();
            let run = compute_stations(&points, start, None, 1.0, StationFormat::IMPERIAL);

            prop_assert_eq!(run.assignments().len(), points.len().max(1));
            for pair in run.assignments().windows(2) {
                prop_assert!(pair[1].station_value() >= pair[0].station_value());
            }
        }

        #[test]
        fn formatted_station_parses_back(value in -1e7f64..1e7) {
            let parsed = parse_station(&format_station(value)).unwrap();
            prop_assert!((parsed - value).abs() <= 0.005 + 1e-6);
        }
    }
}
