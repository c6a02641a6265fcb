//! Diversion scoring engine.
//!
//! Scoring is a pure function of the aircraft state, the airport table, the
//! rules and a fitted model. Every airport yields exactly one result, in
//! table order.

use crate::error::{AvertError, Result};
use crate::models::{AircraftState, AirportRecord, ScoreResult};
use crate::rules::ScoringRules;
use crate::spatial::{bearing_deg, distance_nm, wind_component};

/// Any regressor that predicts suitability from the scoring features.
pub trait SuitabilityModel {
    fn predict(&self, altitude_ft: f64, distance_nm: f64, wind_component_kt: f64) -> f64;
}

/// Score a single airport.
pub fn score_airport<M: SuitabilityModel + ?Sized>(
    airport: &AirportRecord,
    state: &AircraftState,
    ml_enabled: bool,
    model: &M,
    rules: &ScoringRules,
) -> ScoreResult {
    let aircraft = state.position();
    let target = airport.position();
    let altitude = state.altitude_ft as f64;

    let dist = distance_nm(aircraft, target);
    let brg = bearing_deg(aircraft, target);
    let wind = wind_component(brg, state.wind_dir_deg as f64, state.wind_speed_kt as f64);

    let rule_score = rules.rule_score(altitude, wind, dist);
    let ml_score = model.predict(altitude, dist, wind);
    let final_score = rules.blend(rule_score, ml_score, ml_enabled);

    ScoreResult {
        icao: airport.icao.clone(),
        name: airport.name.clone(),
        lat: airport.lat,
        lon: airport.lon,
        distance_nm: dist,
        bearing_deg: brg,
        wind_component_kt: wind,
        rule_score,
        ml_score,
        final_score,
        status: rules.classify(final_score, dist, altitude),
    }
}

/// Score every airport in table order.
///
/// Fails fast on an empty table, an unusable airport record or an
/// out-of-range aircraft state rather than producing a partial ranking.
pub fn evaluate<M: SuitabilityModel + ?Sized>(
    airports: &[AirportRecord],
    state: &AircraftState,
    ml_enabled: bool,
    model: &M,
    rules: &ScoringRules,
) -> Result<Vec<ScoreResult>> {
    if airports.is_empty() {
        return Err(AvertError::EmptyAirportTable);
    }
    validate_airports(airports)?;
    state.validate()?;

    Ok(airports
        .iter()
        .map(|airport| score_airport(airport, state, ml_enabled, model, rules))
        .collect())
}

/// Check every record has a code and finite, in-range coordinates.
pub fn validate_airports(airports: &[AirportRecord]) -> Result<()> {
    for airport in airports {
        let errors = airport.validate();
        if !errors.is_empty() {
            return Err(AvertError::InvalidAirport {
                icao: airport.icao.clone(),
                reason: errors.join("; "),
            });
        }
    }
    Ok(())
}
