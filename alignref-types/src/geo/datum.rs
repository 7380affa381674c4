/// Reference ellipsoid of a geodetic datum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    name: &'static str,
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// WGS84 ellipsoid.
    pub const WGS84: Self = Datum {
        name: "WGS84",
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// GRS80 ellipsoid, used by the NAD83 family of datums.
    pub const GRS80: Self = Datum {
        name: "GRS80",
        semimajor: 6_378_137.0,
        inv_flattening: 298.257222101,
    };

    /// Ellipsoid name as understood by projection definitions (`ellps=...`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Semi-major axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }
}
