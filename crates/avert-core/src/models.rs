//! Core data models for diversion scoring.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AvertError, Result};
use crate::spatial::GeoPoint;

pub const MIN_ALTITUDE_FT: i64 = 5_000;
pub const MAX_ALTITUDE_FT: i64 = 25_000;
pub const MAX_WIND_SPEED_KT: i64 = 50;
pub const MAX_WIND_DIR_DEG: i64 = 360;

/// A candidate diversion airport from the static airport table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub icao: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl AirportRecord {
    pub fn new(icao: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            icao: icao.into(),
            name: name.into(),
            lat,
            lon,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Check the record is usable for scoring.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.icao.trim().is_empty() {
            errors.push("Airport code is empty".to_string());
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            errors.push(format!("Latitude {} is not a valid coordinate", self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            errors.push(format!("Longitude {} is not a valid coordinate", self.lon));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Simulated aircraft positions available to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftPosition {
    #[default]
    Bengaluru,
    Hyderabad,
    Chennai,
    Mumbai,
}

impl AircraftPosition {
    pub const ALL: [AircraftPosition; 4] = [
        AircraftPosition::Bengaluru,
        AircraftPosition::Hyderabad,
        AircraftPosition::Chennai,
        AircraftPosition::Mumbai,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AircraftPosition::Bengaluru => "Bengaluru (VOBL)",
            AircraftPosition::Hyderabad => "Hyderabad (VOHS)",
            AircraftPosition::Chennai => "Chennai (VOMM)",
            AircraftPosition::Mumbai => "Mumbai (VABB)",
        }
    }

    pub fn coordinates(&self) -> GeoPoint {
        match self {
            AircraftPosition::Bengaluru => GeoPoint::new(12.9716, 77.5946),
            AircraftPosition::Hyderabad => GeoPoint::new(17.2403, 78.4294),
            AircraftPosition::Chennai => GeoPoint::new(12.9941, 80.1709),
            AircraftPosition::Mumbai => GeoPoint::new(19.0896, 72.8656),
        }
    }
}

impl fmt::Display for AircraftPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aircraft controls supplied per interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: i64,
    pub wind_speed_kt: i64,
    pub wind_dir_deg: i64,
}

impl AircraftState {
    /// Build a state at one of the simulated positions.
    pub fn at(
        position: AircraftPosition,
        altitude_ft: i64,
        wind_speed_kt: i64,
        wind_dir_deg: i64,
    ) -> Self {
        let point = position.coordinates();
        Self {
            lat: point.lat,
            lon: point.lon,
            altitude_ft,
            wind_speed_kt,
            wind_dir_deg,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Ensure every control is inside its operating range.
    pub fn validate(&self) -> Result<()> {
        check_range("altitude_ft", self.altitude_ft, MIN_ALTITUDE_FT, MAX_ALTITUDE_FT)?;
        check_range("wind_speed_kt", self.wind_speed_kt, 0, MAX_WIND_SPEED_KT)?;
        check_range("wind_dir_deg", self.wind_dir_deg, 0, MAX_WIND_DIR_DEG)?;
        Ok(())
    }
}

impl Default for AircraftState {
    fn default() -> Self {
        Self::at(AircraftPosition::default(), 18_000, 30, 270)
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(AvertError::StateOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Suitability classification of a diversion airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiversionStatus {
    /// Beyond the altitude-derived reach limit
    Unreachable,
    High,
    Medium,
    Low,
}

impl DiversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiversionStatus::Unreachable => "UNREACHABLE",
            DiversionStatus::High => "HIGH",
            DiversionStatus::Medium => "MEDIUM",
            DiversionStatus::Low => "LOW",
        }
    }
}

impl fmt::Display for DiversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one airport in one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub icao: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    /// Wind projected onto the bearing (knots)
    pub wind_component_kt: f64,
    pub rule_score: f64,
    pub ml_score: f64,
    /// Score used for ranking (blended when ML is enabled)
    pub final_score: f64,
    pub status: DiversionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_matches_operator_defaults() {
        let state = AircraftState::default();
        assert_eq!(state.altitude_ft, 18_000);
        assert_eq!(state.wind_speed_kt, 30);
        assert_eq!(state.wind_dir_deg, 270);
        assert_eq!(state.position(), AircraftPosition::Bengaluru.coordinates());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_state_rejects_out_of_range_controls() {
        let mut state = AircraftState::default();
        state.altitude_ft = 4_999;
        assert!(matches!(
            state.validate(),
            Err(AvertError::StateOutOfRange { field: "altitude_ft", .. })
        ));

        let mut state = AircraftState::default();
        state.wind_speed_kt = 51;
        assert!(state.validate().is_err());

        let mut state = AircraftState::default();
        state.wind_dir_deg = -10;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_state_accepts_range_edges() {
        let low = AircraftState::at(AircraftPosition::Mumbai, 5_000, 0, 0);
        let high = AircraftState::at(AircraftPosition::Chennai, 25_000, 50, 360);
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_airport_validation() {
        let good = AirportRecord::new("VOBL", "Kempegowda", 13.1979, 77.7063);
        assert!(good.is_valid());

        let bad = AirportRecord::new(" ", "Nowhere", f64::NAN, 200.0);
        assert_eq!(bad.validate().len(), 3);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&DiversionStatus::Unreachable).unwrap();
        assert_eq!(json, "\"UNREACHABLE\"");
        assert_eq!(DiversionStatus::Medium.to_string(), "MEDIUM");
    }
}
