//! Map overlay geometry for a navigation display.
//!
//! Nothing here draws. The overlay is plain serializable data (marker
//! positions and colors, the wind arrow, per-airport turn arcs) that a
//! presentation layer renders as-is. All offsets are on the same planar
//! degree grid as [`crate::spatial`].

use serde::{Deserialize, Serialize};

use crate::models::{AircraftState, DiversionStatus, ScoreResult};
use crate::spatial::{offset_on_grid, GeoPoint};

/// Points drawn along each turn arc.
pub const TURN_ARC_POINTS: usize = 20;
/// Angular step between turn arc points, in degrees.
pub const TURN_ARC_STEP_DEG: f64 = 9.0;
/// Smallest turn arc radius, in degrees.
pub const MIN_TURN_RADIUS_DEG: f64 = 0.25;
/// Altitude (ft) per degree of turn radius.
pub const TURN_RADIUS_ALT_DIVISOR_FT: f64 = 70_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Orange,
    Red,
}

impl From<DiversionStatus> for MarkerColor {
    fn from(status: DiversionStatus) -> Self {
        match status {
            DiversionStatus::High => MarkerColor::Green,
            DiversionStatus::Medium => MarkerColor::Orange,
            DiversionStatus::Low | DiversionStatus::Unreachable => MarkerColor::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportMarker {
    pub icao: String,
    pub position: GeoPoint,
    pub color: MarkerColor,
    pub tooltip: String,
}

/// Wind arrow drawn from `tail` to the aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub tail: GeoPoint,
    pub head: GeoPoint,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnArc {
    pub icao: String,
    pub color: MarkerColor,
    pub radius_deg: f64,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOverlay {
    pub aircraft: GeoPoint,
    pub wind: WindVector,
    pub markers: Vec<AirportMarker>,
    pub turn_arcs: Vec<TurnArc>,
}

/// Build overlay geometry for one evaluation pass.
///
/// `results` should be in airport-table order; markers and arcs follow it.
pub fn build_overlay(state: &AircraftState, results: &[ScoreResult]) -> MapOverlay {
    let aircraft = state.position();
    let radius = turn_radius_deg(state.altitude_ft as f64);

    let markers = results.iter().map(marker_for).collect();
    let turn_arcs = results
        .iter()
        .map(|r| TurnArc {
            icao: r.icao.clone(),
            color: r.status.into(),
            radius_deg: radius,
            points: turn_arc(aircraft, r.bearing_deg, radius),
        })
        .collect();

    MapOverlay {
        aircraft,
        wind: wind_vector(state),
        markers,
        turn_arcs,
    }
}

fn marker_for(result: &ScoreResult) -> AirportMarker {
    AirportMarker {
        icao: result.icao.clone(),
        position: GeoPoint::new(result.lat, result.lon),
        color: result.status.into(),
        tooltip: format!(
            "{} – {} | {} nm | {}",
            result.icao,
            result.name,
            result.distance_nm.trunc() as i64,
            result.status
        ),
    }
}

/// Arrow drawn from the downwind side into the aircraft; longer for stronger wind.
pub fn wind_vector(state: &AircraftState) -> WindVector {
    let aircraft = state.position();
    let angle = (state.wind_dir_deg as f64 + 180.0).to_radians();
    let scale = 0.25 + state.wind_speed_kt as f64 / 120.0;

    WindVector {
        tail: offset_on_grid(aircraft, scale, angle),
        head: aircraft,
        label: format!("Wind {}° / {} kt", state.wind_dir_deg, state.wind_speed_kt),
    }
}

pub fn turn_radius_deg(altitude_ft: f64) -> f64 {
    (altitude_ft / TURN_RADIUS_ALT_DIVISOR_FT).max(MIN_TURN_RADIUS_DEG)
}

/// Half-circle arc around the aircraft centred on `bearing_deg`.
pub fn turn_arc(center: GeoPoint, bearing_deg: f64, radius_deg: f64) -> Vec<GeoPoint> {
    (0..TURN_ARC_POINTS)
        .map(|t| {
            let angle = (bearing_deg - 90.0 + t as f64 * TURN_ARC_STEP_DEG).to_radians();
            offset_on_grid(center, radius_deg, angle)
        })
        .collect()
}
