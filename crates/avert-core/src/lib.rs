//! AVERT - Airborne Vectoring & Emergency Routing.
//!
//! Scores and ranks candidate diversion airports for a simulated aircraft,
//! blending a closed-form heuristic with a random-forest regressor trained
//! on synthetic data. Decision support only.

pub mod airports;
pub mod error;
pub mod forest;
pub mod models;
pub mod overlay;
pub mod ranking;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod spatial;
pub mod trainer;

pub use airports::{load_airports, load_airports_from_reader, AirportTable, RejectedRow};
pub use error::{AvertError, Result};
pub use forest::{ForestParams, RandomForestRegressor};
pub use models::{AircraftPosition, AircraftState, AirportRecord, DiversionStatus, ScoreResult};
pub use overlay::{build_overlay, AirportMarker, MapOverlay, MarkerColor, TurnArc, WindVector};
pub use ranking::{format_report, rank, RankedEntry};
pub use rules::{SampleRange, ScoringRules, TrainerConfig};
pub use scoring::{evaluate, score_airport, validate_airports, SuitabilityModel};
pub use session::Session;
pub use spatial::{bearing_deg, distance_nm, wind_component, GeoPoint};
pub use trainer::{generate_samples, train_model, TrainedModel, TrainingSample};
