//! Ranked diversion list and its text report.

use serde::{Deserialize, Serialize};

use crate::models::{DiversionStatus, ScoreResult};

/// One line of the ranked diversion list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-indexed position
    pub rank: usize,
    pub icao: String,
    pub name: String,
    pub status: DiversionStatus,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub score: f64,
}

impl RankedEntry {
    /// Report line, e.g. `1. VOBL – Kempegowda | HIGH | 60 nm | Bearing 90° | Score 1.79`.
    pub fn report_line(&self) -> String {
        format!(
            "{}. {} – {} | {} | {} nm | Bearing {}° | Score {:.2}",
            self.rank,
            self.icao,
            self.name,
            self.status,
            self.distance_nm.trunc() as i64,
            self.bearing_deg.trunc() as i64,
            self.score,
        )
    }
}

/// Sort results by final score, highest first.
///
/// The sort is stable: equal scores keep their airport-table order.
pub fn rank(results: &[ScoreResult]) -> Vec<RankedEntry> {
    let mut ordered: Vec<&ScoreResult> = results.iter().collect();
    ordered.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, result)| RankedEntry {
            rank: i + 1,
            icao: result.icao.clone(),
            name: result.name.clone(),
            status: result.status,
            distance_nm: result.distance_nm,
            bearing_deg: result.bearing_deg,
            score: result.final_score,
        })
        .collect()
}

/// Render the ranking as newline-separated report lines.
pub fn format_report(ranking: &[RankedEntry]) -> String {
    ranking
        .iter()
        .map(RankedEntry::report_line)
        .collect::<Vec<_>>()
        .join("\n")
}
