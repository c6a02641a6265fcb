//! Error types for the AVERT core.

use std::io;
use thiserror::Error;

/// Errors raised while configuring or running an evaluation pass.
#[derive(Debug, Error)]
pub enum AvertError {
    /// No airports were supplied, so there is nothing to rank.
    #[error("Airport table is empty; at least one valid airport is required")]
    EmptyAirportTable,

    /// The airport table is missing a required column.
    #[error("Airport table is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// An aircraft control value is outside its allowed range.
    #[error("Aircraft {field} = {value} is outside the allowed range [{min}, {max}]")]
    StateOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// An airport record cannot be scored.
    #[error("Airport '{icao}' is invalid: {reason}")]
    InvalidAirport { icao: String, reason: String },

    /// A scoring constant would make scores undefined.
    #[error("Invalid scoring rules: {0}")]
    InvalidRules(String),

    /// The synthetic trainer was configured with unusable parameters.
    #[error("Invalid trainer configuration: {0}")]
    InvalidTrainerConfig(String),

    /// Failed to read the airport table.
    #[error("Failed to read airport table: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to open an input file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse a scoring rules document.
    #[error("Malformed scoring rules: {0}")]
    Rules(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AvertError>;
