//! Synthetic training for the suitability regressor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::forest::{ForestParams, RandomForestRegressor};
use crate::rules::TrainerConfig;
use crate::scoring::SuitabilityModel;

/// One synthetic scenario and its suitability label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub altitude_ft: f64,
    pub distance_nm: f64,
    pub wind_kt: f64,
    pub label: f64,
}

impl TrainingSample {
    pub fn features(&self) -> Vec<f64> {
        vec![self.altitude_ft, self.distance_nm, self.wind_kt]
    }
}

/// Draw the synthetic dataset.
///
/// Each sample draws altitude, distance and wind in that order from one
/// seeded generator, so the dataset is fixed for a given config.
pub fn generate_samples(config: &TrainerConfig) -> Result<Vec<TrainingSample>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let samples = (0..config.samples)
        .map(|_| {
            let altitude_ft = rng.random_range(config.altitude_ft.min..config.altitude_ft.max);
            let distance_nm = rng.random_range(config.distance_nm.min..config.distance_nm.max);
            let wind_kt = rng.random_range(config.wind_kt.min..config.wind_kt.max);
            TrainingSample {
                altitude_ft,
                distance_nm,
                wind_kt,
                label: config.label(altitude_ft, distance_nm, wind_kt),
            }
        })
        .collect();

    Ok(samples)
}

/// Regressor mapping (altitude, distance, wind component) to suitability.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    forest: RandomForestRegressor,
    samples: usize,
}

impl TrainedModel {
    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    /// Number of synthetic samples the model was fit on.
    pub fn sample_count(&self) -> usize {
        self.samples
    }
}

impl SuitabilityModel for TrainedModel {
    fn predict(&self, altitude_ft: f64, distance_nm: f64, wind_component_kt: f64) -> f64 {
        self.forest
            .predict(&[altitude_ft, distance_nm, wind_component_kt])
    }
}

/// Generate the synthetic dataset and fit the forest.
pub fn train_model(config: &TrainerConfig) -> Result<TrainedModel> {
    let samples = generate_samples(config)?;
    let x: Vec<Vec<f64>> = samples.iter().map(TrainingSample::features).collect();
    let y: Vec<f64> = samples.iter().map(|s| s.label).collect();

    let params = ForestParams {
        n_trees: config.trees,
        max_depth: config.max_depth,
        min_samples_split: config.min_samples_split,
        seed: config.seed,
    };
    let forest = RandomForestRegressor::fit(&x, &y, &params)?;

    Ok(TrainedModel {
        forest,
        samples: samples.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TrainerConfig {
        TrainerConfig {
            samples: 300,
            trees: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_samples_respect_ranges_and_label() {
        let config = TrainerConfig::default();
        let samples = generate_samples(&config).unwrap();
        assert_eq!(samples.len(), 800);

        for s in &samples {
            assert!((5_000.0..25_000.0).contains(&s.altitude_ft));
            assert!((30.0..400.0).contains(&s.distance_nm));
            assert!((-40.0..40.0).contains(&s.wind_kt));
            let expected = s.altitude_ft / 12_000.0 + s.wind_kt / 45.0 - s.distance_nm / 180.0;
            assert_eq!(s.label, expected);
        }
    }

    #[test]
    fn test_samples_are_reproducible_and_seed_dependent() {
        let config = TrainerConfig::default();
        let a = generate_samples(&config).unwrap();
        let b = generate_samples(&config).unwrap();
        assert_eq!(a, b);

        let other = TrainerConfig {
            seed: 7,
            ..Default::default()
        };
        assert_ne!(a, generate_samples(&other).unwrap());
    }

    #[test]
    fn test_model_reports_shape() {
        let model = train_model(&small_config()).unwrap();
        assert_eq!(model.sample_count(), 300);
        assert_eq!(model.forest().tree_count(), 30);
        assert_eq!(model.forest().feature_count(), 3);
    }

    #[test]
    fn test_model_trends_follow_label() {
        let model = train_model(&small_config()).unwrap();

        let low_alt = model.predict(7_000.0, 150.0, 0.0);
        let high_alt = model.predict(23_000.0, 150.0, 0.0);
        assert!(high_alt > low_alt, "altitude: {high_alt} <= {low_alt}");

        let near = model.predict(15_000.0, 50.0, 0.0);
        let far = model.predict(15_000.0, 380.0, 0.0);
        assert!(near > far, "distance: {near} <= {far}");

        let headwind = model.predict(15_000.0, 150.0, -35.0);
        let tailwind = model.predict(15_000.0, 150.0, 35.0);
        assert!(tailwind > headwind, "wind: {tailwind} <= {headwind}");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TrainerConfig {
            trees: 0,
            ..Default::default()
        };
        assert!(train_model(&config).is_err());
    }
}
