//! AVERT - ranked emergency diversion options for a simulated aircraft.
//!
//! Decision support only. Not certified avionics logic.
//!
//! Usage:
//!   cargo run -p avert-cli -- --position hyderabad --altitude 12000 --no-ml
//!   cargo run -p avert-cli -- --format json --overlay
//!   RUST_LOG=avert_cli=debug cargo run -p avert-cli -- --log-json

mod config;

use anyhow::{Context, Result};
use avert_core::{
    load_airports, AircraftPosition, AircraftState, MapOverlay, RankedEntry, RejectedRow,
    ScoringRules, Session,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Position {
    Bengaluru,
    Hyderabad,
    Chennai,
    Mumbai,
}

impl From<Position> for AircraftPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Bengaluru => AircraftPosition::Bengaluru,
            Position::Hyderabad => AircraftPosition::Hyderabad,
            Position::Chennai => AircraftPosition::Chennai,
            Position::Mumbai => AircraftPosition::Mumbai,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "AVERT: Airborne Vectoring & Emergency Routing")]
struct Args {
    /// Simulated aircraft position
    #[arg(long, value_enum, default_value_t = Position::Bengaluru)]
    position: Position,

    /// Altitude in feet (5000-25000)
    #[arg(long, default_value_t = 18_000)]
    altitude: i64,

    /// Wind speed in knots (0-50)
    #[arg(long, default_value_t = 30)]
    wind_speed: i64,

    /// Wind direction in degrees (0-360)
    #[arg(long, default_value_t = 270)]
    wind_dir: i64,

    /// Rank on the rule score alone
    #[arg(long)]
    no_ml: bool,

    /// Airport table CSV (icao,name,lat,lon). Overrides AVERT_AIRPORTS.
    #[arg(long)]
    airports: Option<PathBuf>,

    /// Scoring rules JSON. Overrides AVERT_RULES.
    #[arg(long)]
    rules: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Include map overlay geometry (JSON output only)
    #[arg(long)]
    overlay: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    position: &'static str,
    state: &'a AircraftState,
    ml_enabled: bool,
    ranking: &'a [RankedEntry],
    rejected_rows: &'a [RejectedRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<MapOverlay>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);
    run(args)
}

fn init_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("avert_cli=info")),
    );
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_env().with_overrides(args.airports.clone(), args.rules.clone());

    let rules = match &config.rules_path {
        Some(path) => ScoringRules::from_path(path)
            .with_context(|| format!("Failed to load scoring rules from {}", path.display()))?,
        None => ScoringRules::default(),
    };

    let table = load_airports(&config.airports_path).with_context(|| {
        format!(
            "Failed to load airport table from {}",
            config.airports_path.display()
        )
    })?;
    for row in &table.rejected {
        match row.line {
            Some(line) => tracing::warn!("Skipping airport row at line {}: {}", line, row.reason),
            None => tracing::warn!("Skipping airport row: {}", row.reason),
        }
    }
    tracing::info!(
        "Loaded {} airports from {} ({} rejected)",
        table.airports.len(),
        config.airports_path.display(),
        table.rejected.len()
    );

    tracing::info!(
        "Training suitability model: {} samples, {} trees, seed {}",
        rules.trainer.samples,
        rules.trainer.trees,
        rules.trainer.seed
    );
    let session =
        Session::new(table.airports, rules).context("Failed to prepare scoring session")?;
    tracing::debug!("Model has {} nodes", session.model().forest().node_count());

    let position = AircraftPosition::from(args.position);
    let state = AircraftState::at(position, args.altitude, args.wind_speed, args.wind_dir);
    let ml_enabled = !args.no_ml;

    let results = session
        .evaluate(&state, ml_enabled)
        .context("Invalid aircraft state")?;
    let ranking = avert_core::rank(&results);
    tracing::info!(
        "Ranked {} airports from {} (ML {})",
        ranking.len(),
        position,
        if ml_enabled { "on" } else { "off" }
    );

    match args.format {
        OutputFormat::Text => {
            if args.overlay {
                tracing::warn!("--overlay only applies to JSON output");
            }
            print_text(position, &state, ml_enabled, &ranking);
        }
        OutputFormat::Json => {
            let report = JsonReport {
                position: position.label(),
                state: &state,
                ml_enabled,
                ranking: &ranking,
                rejected_rows: &table.rejected,
                overlay: args
                    .overlay
                    .then(|| avert_core::build_overlay(&state, &results)),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_text(
    position: AircraftPosition,
    state: &AircraftState,
    ml_enabled: bool,
    ranking: &[RankedEntry],
) {
    println!("AVERT – Ranked Diversion Options");
    println!(
        "Aircraft: {} | {} ft | Wind {}° / {} kt | ML-assisted ranking {}",
        position,
        state.altitude_ft,
        state.wind_dir_deg,
        state.wind_speed_kt,
        if ml_enabled { "ON" } else { "OFF" }
    );
    println!();
    println!("{}", avert_core::format_report(ranking));
}
