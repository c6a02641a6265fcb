//! Random-forest regression.
//!
//! Bootstrap-aggregated CART trees split on variance reduction. Every
//! feature is considered at every split, so the only randomness is the
//! bootstrap draw, which comes from a seeded [`StdRng`]. Fitting the same
//! data with the same parameters always yields the same forest.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

use crate::error::{AvertError, Result};

/// Constant-valued nodes stop splitting below this label spread.
const PURE_NODE_EPS: f64 = 1e-12;

/// Forest hyper-parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Number of samples routed left once sorted on `feature`
    position: usize,
    score: f64,
}

/// A single regression tree stored as a flat node arena. Node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
struct RegressionTree {
    nodes: Vec<Node>,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    n_features: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(mut self, indices: &mut [usize]) -> RegressionTree {
        self.grow(indices, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let node_id = self.nodes.len();
        let mean = indices.iter().map(|&i| self.y[i]).sum::<f64>() / indices.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        if self.should_stop(indices, depth) {
            return node_id;
        }

        let Some(split) = self.best_split(indices) else {
            return node_id;
        };

        sort_by_feature(self.x, indices, split.feature);
        let (left_idx, right_idx) = indices.split_at_mut(split.position);
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    fn should_stop(&self, indices: &[usize], depth: usize) -> bool {
        if indices.len() < self.min_samples_split {
            return true;
        }
        if self.max_depth.is_some_and(|max| depth >= max) {
            return true;
        }
        let (lo, hi) = indices
            .iter()
            .map(|&i| self.y[i])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        hi - lo <= PURE_NODE_EPS
    }

    /// Find the split maximising `sum_l^2 / n_l + sum_r^2 / n_r`, which is
    /// equivalent to minimising the summed squared error of both children.
    /// Ties keep the first candidate in feature-then-value order.
    fn best_split(&self, indices: &[usize]) -> Option<BestSplit> {
        let n = indices.len();
        let total: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let mut best: Option<BestSplit> = None;
        let mut sorted = indices.to_vec();

        for feature in 0..self.n_features {
            sort_by_feature(self.x, &mut sorted, feature);

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += self.y[sorted[k - 1]];

                let lo = self.x[sorted[k - 1]][feature];
                let hi = self.x[sorted[k]][feature];
                if lo >= hi {
                    continue;
                }

                let right_sum = total - left_sum;
                let score =
                    left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;

                if best.is_none_or(|b| score > b.score) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        position: k,
                        score,
                    });
                }
            }
        }

        best
    }
}

fn sort_by_feature(x: &[Vec<f64>], indices: &mut [usize], feature: usize) {
    indices.sort_by(|&a, &b| {
        x[a][feature]
            .partial_cmp(&x[b][feature])
            .unwrap_or(Ordering::Equal)
    });
}

impl RegressionTree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Ensemble of regression trees averaged at prediction time.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit a forest on row-major features `x` and targets `y`.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self> {
        if x.is_empty() {
            return Err(AvertError::InvalidTrainerConfig(
                "cannot fit a forest on zero samples".into(),
            ));
        }
        if x.len() != y.len() {
            return Err(AvertError::InvalidTrainerConfig(format!(
                "feature rows ({}) and targets ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(AvertError::InvalidTrainerConfig(
                "forest needs at least one tree".into(),
            ));
        }

        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(AvertError::InvalidTrainerConfig(
                "feature rows must share a non-zero width".into(),
            ));
        }
        if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(AvertError::InvalidTrainerConfig(
                "training data contains non-finite values".into(),
            ));
        }

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let mut bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let builder = TreeBuilder {
                x,
                y,
                n_features,
                max_depth: params.max_depth,
                min_samples_split: params.min_samples_split.max(2),
                nodes: Vec::new(),
            };
            trees.push(builder.build(&mut bootstrap));
        }

        Ok(Self { trees, n_features })
    }

    /// Mean prediction across all trees.
    ///
    /// # Panics
    /// Panics if `row` is narrower than the training feature width.
    pub fn predict(&self, row: &[f64]) -> f64 {
        assert!(
            row.len() >= self.n_features,
            "expected {} features, got {}",
            self.n_features,
            row.len()
        );
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_count(&self) -> usize {
        self.n_features
    }

    /// Total nodes across all trees.
    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|tree| tree.nodes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 1.0 } else { 5.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_single_tree_learns_step() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_trees: 1,
            seed: 7,
            ..Default::default()
        };
        let forest = RandomForestRegressor::fit(&x, &y, &params).unwrap();
        assert_eq!(forest.predict(&[2.0]), 1.0);
        assert_eq!(forest.predict(&[35.0]), 5.0);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, -(i as f64)]).collect();
        let y = vec![3.25; 10];
        let forest = RandomForestRegressor::fit(&x, &y, &ForestParams::default()).unwrap();
        assert_eq!(forest.node_count(), forest.tree_count());
        assert_eq!(forest.predict(&[100.0, 0.0]), 3.25);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let x: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..64).map(|i| (i * i) as f64).collect();
        let params = ForestParams {
            n_trees: 3,
            max_depth: Some(1),
            ..Default::default()
        };
        let forest = RandomForestRegressor::fit(&x, &y, &params).unwrap();
        // Depth 1 means a root split and two leaves per tree at most
        assert!(forest.node_count() <= 3 * 3);
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_trees: 10,
            seed: 42,
            ..Default::default()
        };
        let a = RandomForestRegressor::fit(&x, &y, &params).unwrap();
        let b = RandomForestRegressor::fit(&x, &y, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predictions_stay_within_target_range() {
        let (x, y) = step_data();
        let forest = RandomForestRegressor::fit(&x, &y, &ForestParams::default()).unwrap();
        for probe in [-100.0, 0.0, 19.5, 20.0, 1e6] {
            let p = forest.predict(&[probe]);
            assert!((1.0..=5.0).contains(&p), "prediction {p} escaped target range");
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let params = ForestParams::default();
        assert!(RandomForestRegressor::fit(&[], &[], &params).is_err());
        assert!(RandomForestRegressor::fit(&[vec![1.0]], &[1.0, 2.0], &params).is_err());
        assert!(RandomForestRegressor::fit(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 2.0], &params)
            .is_err());
        assert!(RandomForestRegressor::fit(&[vec![f64::NAN]], &[1.0], &params).is_err());

        let no_trees = ForestParams {
            n_trees: 0,
            ..Default::default()
        };
        assert!(RandomForestRegressor::fit(&[vec![1.0]], &[1.0], &no_trees).is_err());
    }
}
