//! Memoized evaluation across interactions.
//!
//! Training is deterministic for a given [`TrainerConfig`](crate::rules::TrainerConfig),
//! so a session fits the model once and reuses it for every pass. Each pass
//! is otherwise independent: nothing from one evaluation carries into the
//! next.

use crate::error::{AvertError, Result};
use crate::models::{AircraftState, AirportRecord, ScoreResult};
use crate::overlay::{build_overlay, MapOverlay};
use crate::ranking::{rank, RankedEntry};
use crate::rules::ScoringRules;
use crate::scoring::{evaluate, validate_airports};
use crate::trainer::{train_model, TrainedModel};

#[derive(Debug, Clone)]
pub struct Session {
    airports: Vec<AirportRecord>,
    rules: ScoringRules,
    model: TrainedModel,
}

impl Session {
    /// Validate inputs and fit the model.
    pub fn new(airports: Vec<AirportRecord>, rules: ScoringRules) -> Result<Self> {
        if airports.is_empty() {
            return Err(AvertError::EmptyAirportTable);
        }
        validate_airports(&airports)?;
        rules.validate()?;
        let model = train_model(&rules.trainer)?;
        Ok(Self {
            airports,
            rules,
            model,
        })
    }

    pub fn airports(&self) -> &[AirportRecord] {
        &self.airports
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Score every airport in table order.
    pub fn evaluate(&self, state: &AircraftState, ml_enabled: bool) -> Result<Vec<ScoreResult>> {
        evaluate(&self.airports, state, ml_enabled, &self.model, &self.rules)
    }

    /// Score and rank in one step.
    pub fn ranking(&self, state: &AircraftState, ml_enabled: bool) -> Result<Vec<RankedEntry>> {
        Ok(rank(&self.evaluate(state, ml_enabled)?))
    }

    /// Score and build map overlay geometry in one step.
    pub fn overlay(&self, state: &AircraftState, ml_enabled: bool) -> Result<MapOverlay> {
        Ok(build_overlay(state, &self.evaluate(state, ml_enabled)?))
    }
}
