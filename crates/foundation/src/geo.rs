use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
///
/// Serializes as a `[lon, lat]` pair, the order map renderers expect.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub const fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }

    /// Accepts only finite coordinates inside the WGS84 degree ranges.
    pub fn checked(lon_deg: f64, lat_deg: f64) -> Option<Self> {
        let p = Self::new(lon_deg, lat_deg);
        if !p.is_finite() || !(-180.0..=180.0).contains(&lon_deg) || !(-90.0..=90.0).contains(&lat_deg)
        {
            return None;
        }
        Some(p)
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon_deg, lat_deg]: [f64; 2]) -> Self {
        Self { lon_deg, lat_deg }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon_deg, p.lat_deg]
    }
}

/// Position with altitude in meters, serialized as `[lon, lat, alt]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct GeoPosition {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}

impl GeoPosition {
    pub const fn new(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            alt_m,
        }
    }

    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.lon_deg, self.lat_deg)
    }
}

impl From<[f64; 3]> for GeoPosition {
    fn from([lon_deg, lat_deg, alt_m]: [f64; 3]) -> Self {
        Self::new(lon_deg, lat_deg, alt_m)
    }
}

impl From<GeoPosition> for [f64; 3] {
    fn from(p: GeoPosition) -> Self {
        [p.lon_deg, p.lat_deg, p.alt_m]
    }
}
