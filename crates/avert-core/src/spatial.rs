//! Flat-grid geometry and wind resolution for diversion scoring.
//!
//! Coordinates are treated as a planar grid of degrees where one degree is
//! taken as 60 nautical miles. No great-circle correction is applied.

use serde::{Deserialize, Serialize};

/// Nautical miles per degree on the planar grid.
pub const NM_PER_DEG: f64 = 60.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Planar distance between two points in nautical miles.
pub fn distance_nm(from: GeoPoint, to: GeoPoint) -> f64 {
    let dlat = to.lat - from.lat;
    let dlon = to.lon - from.lon;
    (dlat * dlat + dlon * dlon).sqrt() * NM_PER_DEG
}

/// Angle of the vector `from -> to` in degrees, normalized into [0, 360).
///
/// The longitude delta is the first `atan2` argument, so 0 points along
/// increasing latitude and 90 along increasing longitude on the grid. Wind
/// resolution is defined against this same angle.
pub fn bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let dlat = to.lat - from.lat;
    let dlon = to.lon - from.lon;
    let deg = (dlon.atan2(dlat).to_degrees() + 360.0).rem_euclid(360.0);
    // 360 - epsilon can round up to 360 after the addition.
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// Smallest absolute angle between a bearing and a wind direction, in [0, 180].
pub fn relative_wind_angle(bearing_deg: f64, wind_dir_deg: f64) -> f64 {
    ((bearing_deg - wind_dir_deg + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Project the wind onto a bearing.
///
/// Returns `wind_speed * cos(rel)`, where `rel` is the relative angle from
/// [`relative_wind_angle`]. Always within `[-wind_speed, wind_speed]`.
pub fn wind_component(bearing_deg: f64, wind_dir_deg: f64, wind_speed_kt: f64) -> f64 {
    let rel = relative_wind_angle(bearing_deg, wind_dir_deg);
    wind_speed_kt * rel.to_radians().cos()
}

/// Offset a point on the grid by `radius` degrees along `angle_rad`.
///
/// Cosine moves latitude and sine moves longitude, matching [`bearing_deg`].
pub fn offset_on_grid(origin: GeoPoint, radius_deg: f64, angle_rad: f64) -> GeoPoint {
    GeoPoint {
        lat: origin.lat + radius_deg * angle_rad.cos(),
        lon: origin.lon + radius_deg * angle_rad.sin(),
    }
}
