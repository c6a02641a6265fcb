//! Scoring thresholds, weights and trainer settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AvertError, Result};
use crate::models::DiversionStatus;

/// Configuration for diversion scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Altitude divisor in the rule score (feet per score point)
    pub altitude_divisor_ft: f64,
    /// Wind component divisor in the rule score (knots per score point)
    pub wind_divisor_kt: f64,
    /// Distance divisor in the rule score (nm per score point)
    pub distance_divisor_nm: f64,
    /// Weight of the rule score when ML blending is enabled
    pub rule_weight: f64,
    /// Weight of the model prediction when ML blending is enabled
    pub ml_weight: f64,
    /// Reach limit is altitude / this value, in nm
    pub glide_ratio_ft_per_nm: f64,
    /// Score must exceed this for HIGH
    pub high_threshold: f64,
    /// Score must exceed this for MEDIUM
    pub medium_threshold: f64,
    pub trainer: TrainerConfig,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            altitude_divisor_ft: 12_000.0,
            wind_divisor_kt: 45.0,
            distance_divisor_nm: 160.0,
            rule_weight: 0.6,
            ml_weight: 0.4,
            glide_ratio_ft_per_nm: 90.0,
            high_threshold: 1.1,
            medium_threshold: 0.8,
            trainer: TrainerConfig::default(),
        }
    }
}

impl ScoringRules {
    /// Parse rules from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject constants that would make scores NaN or infinite, or thresholds
    /// that cannot both be reached.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("altitude_divisor_ft", self.altitude_divisor_ft),
            ("wind_divisor_kt", self.wind_divisor_kt),
            ("distance_divisor_nm", self.distance_divisor_nm),
            ("glide_ratio_ft_per_nm", self.glide_ratio_ft_per_nm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AvertError::InvalidRules(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("rule_weight", self.rule_weight),
            ("ml_weight", self.ml_weight),
            ("high_threshold", self.high_threshold),
            ("medium_threshold", self.medium_threshold),
        ] {
            if !value.is_finite() {
                return Err(AvertError::InvalidRules(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.medium_threshold > self.high_threshold {
            return Err(AvertError::InvalidRules(format!(
                "medium_threshold {} exceeds high_threshold {}",
                self.medium_threshold, self.high_threshold
            )));
        }
        self.trainer.validate()
    }

    /// Closed-form heuristic score.
    pub fn rule_score(&self, altitude_ft: f64, wind_component_kt: f64, distance_nm: f64) -> f64 {
        altitude_ft / self.altitude_divisor_ft + wind_component_kt / self.wind_divisor_kt
            - distance_nm / self.distance_divisor_nm
    }

    /// Score used for ranking.
    pub fn blend(&self, rule_score: f64, ml_score: f64, ml_enabled: bool) -> f64 {
        if ml_enabled {
            self.rule_weight * rule_score + self.ml_weight * ml_score
        } else {
            rule_score
        }
    }

    /// Altitude-derived reach limit in nm.
    pub fn max_range_nm(&self, altitude_ft: f64) -> f64 {
        altitude_ft / self.glide_ratio_ft_per_nm
    }

    /// Classify a scored airport. Comparisons are strict, so a score sitting
    /// exactly on a threshold falls into the lower class and an airport
    /// exactly at the reach limit is reachable.
    pub fn classify(&self, final_score: f64, distance_nm: f64, altitude_ft: f64) -> DiversionStatus {
        if distance_nm > self.max_range_nm(altitude_ft) {
            DiversionStatus::Unreachable
        } else if final_score > self.high_threshold {
            DiversionStatus::High
        } else if final_score > self.medium_threshold {
            DiversionStatus::Medium
        } else {
            DiversionStatus::Low
        }
    }
}

/// Uniform sampling interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Settings for the synthetic training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub seed: u64,
    pub samples: usize,
    pub trees: usize,
    pub altitude_ft: SampleRange,
    pub distance_nm: SampleRange,
    pub wind_kt: SampleRange,
    /// Label = altitude / altitude_divisor + wind / wind_divisor - distance / distance_divisor
    pub label_altitude_divisor: f64,
    pub label_wind_divisor: f64,
    pub label_distance_divisor: f64,
    /// None grows every tree until its leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 800,
            trees: 150,
            altitude_ft: SampleRange::new(5_000.0, 25_000.0),
            distance_nm: SampleRange::new(30.0, 400.0),
            wind_kt: SampleRange::new(-40.0, 40.0),
            label_altitude_divisor: 12_000.0,
            label_wind_divisor: 45.0,
            label_distance_divisor: 180.0,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(AvertError::InvalidTrainerConfig(
                "sample count must be positive".into(),
            ));
        }
        if self.trees == 0 {
            return Err(AvertError::InvalidTrainerConfig(
                "tree count must be positive".into(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(AvertError::InvalidTrainerConfig(
                "min_samples_split must be at least 2".into(),
            ));
        }
        for (name, value) in [
            ("label_altitude_divisor", self.label_altitude_divisor),
            ("label_wind_divisor", self.label_wind_divisor),
            ("label_distance_divisor", self.label_distance_divisor),
        ] {
            if !value.is_finite() || value == 0.0 {
                return Err(AvertError::InvalidTrainerConfig(format!(
                    "{name} must be finite and non-zero, got {value}"
                )));
            }
        }
        for (name, range) in [
            ("altitude_ft", self.altitude_ft),
            ("distance_nm", self.distance_nm),
            ("wind_kt", self.wind_kt),
        ] {
            if !range.is_valid() {
                return Err(AvertError::InvalidTrainerConfig(format!(
                    "{name} range [{}, {}) is empty or not finite",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }

    /// Synthetic suitability label for one sample.
    pub fn label(&self, altitude_ft: f64, distance_nm: f64, wind_kt: f64) -> f64 {
        altitude_ft / self.label_altitude_divisor + wind_kt / self.label_wind_divisor
            - distance_nm / self.label_distance_divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_threshold_boundaries_are_strict() {
        let rules = ScoringRules::default();
        assert_eq!(rules.classify(1.1, 10.0, 18_000.0), DiversionStatus::Medium);
        assert_eq!(rules.classify(1.1000001, 10.0, 18_000.0), DiversionStatus::High);
        assert_eq!(rules.classify(0.8, 10.0, 18_000.0), DiversionStatus::Low);
        assert_eq!(rules.classify(0.8000001, 10.0, 18_000.0), DiversionStatus::Medium);
    }

    #[test]
    fn test_classify_reach_limit_is_inclusive() {
        let rules = ScoringRules::default();
        assert_eq!(rules.max_range_nm(18_000.0), 200.0);
        assert_eq!(rules.classify(2.0, 200.0, 18_000.0), DiversionStatus::High);
        assert_eq!(
            rules.classify(2.0, 200.000001, 18_000.0),
            DiversionStatus::Unreachable
        );
    }

    #[test]
    fn test_unreachable_takes_precedence_over_score() {
        let rules = ScoringRules::default();
        assert_eq!(rules.classify(5.0, 500.0, 5_000.0), DiversionStatus::Unreachable);
    }

    #[test]
    fn test_blend_weights() {
        let rules = ScoringRules::default();
        assert_eq!(rules.blend(1.0, 2.0, false), 1.0);
        assert!((rules.blend(1.0, 2.0, true) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_partial_rules_json_keeps_defaults() {
        let rules = ScoringRules::from_json(r#"{"high_threshold": 1.5, "trainer": {"trees": 10}}"#)
            .unwrap();
        assert_eq!(rules.high_threshold, 1.5);
        assert_eq!(rules.medium_threshold, 0.8);
        assert_eq!(rules.trainer.trees, 10);
        assert_eq!(rules.trainer.samples, 800);
    }

    #[test]
    fn test_invalid_trainer_config_rejected() {
        let err = ScoringRules::from_json(r#"{"trainer": {"samples": 0}}"#).unwrap_err();
        assert!(matches!(err, AvertError::InvalidTrainerConfig(_)));

        let mut config = TrainerConfig::default();
        config.wind_kt = SampleRange::new(10.0, -10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_rules_are_valid() {
        assert!(ScoringRules::default().validate().is_ok());
    }

    #[test]
    fn test_degenerate_divisors_rejected() {
        for json in [
            r#"{"altitude_divisor_ft": 0}"#,
            r#"{"wind_divisor_kt": 0}"#,
            r#"{"distance_divisor_nm": 0}"#,
            r#"{"distance_divisor_nm": -160}"#,
            r#"{"glide_ratio_ft_per_nm": -90}"#,
            r#"{"glide_ratio_ft_per_nm": 0}"#,
        ] {
            let err = ScoringRules::from_json(json).unwrap_err();
            assert!(matches!(err, AvertError::InvalidRules(_)), "{json}: {err}");
        }
    }

    #[test]
    fn test_non_finite_rules_rejected() {
        let mut rules = ScoringRules::default();
        rules.ml_weight = f64::NAN;
        assert!(matches!(rules.validate(), Err(AvertError::InvalidRules(_))));

        let mut rules = ScoringRules::default();
        rules.high_threshold = f64::INFINITY;
        assert!(matches!(rules.validate(), Err(AvertError::InvalidRules(_))));

        let mut rules = ScoringRules::default();
        rules.wind_divisor_kt = f64::INFINITY;
        assert!(matches!(rules.validate(), Err(AvertError::InvalidRules(_))));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = ScoringRules::from_json(r#"{"medium_threshold": 1.5, "high_threshold": 1.1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("medium_threshold"));

        // Equal thresholds leave MEDIUM empty but stay well defined.
        assert!(ScoringRules::from_json(r#"{"medium_threshold": 1.1}"#).is_ok());
    }

    #[test]
    fn test_zero_label_divisor_rejected() {
        let err =
            ScoringRules::from_json(r#"{"trainer": {"label_wind_divisor": 0}}"#).unwrap_err();
        assert!(matches!(err, AvertError::InvalidTrainerConfig(_)));
    }

    #[test]
    fn test_malformed_rules_json_is_error() {
        assert!(matches!(
            ScoringRules::from_json("{not json"),
            Err(AvertError::Rules(_))
        ));
    }
}
