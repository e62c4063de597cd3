//! Random-forest estimator
//!
//! Bagged entropy trees with per-split feature subsampling. Each tree draws a
//! bootstrap sample from a seed derived from the forest seed and the tree
//! index, so a fitted forest is fully reproducible from its parameters and
//! training data.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::{ModelError, Result};
use super::tree::{DecisionTree, SplitCriterion, TreeParams};

/// Forest hyperparameters
///
/// Serde defaults mirror the deployed configuration, so a partial YAML
/// override file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples a node needs to be considered for splitting
    pub min_samples_split: usize,
    /// Minimum samples each child of a split must keep
    pub min_samples_leaf: usize,
    /// Split-purity criterion
    pub criterion: SplitCriterion,
    /// Seed for bootstrap sampling and feature subsampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: 10,
            min_samples_split: 7,
            min_samples_leaf: 6,
            criterion: SplitCriterion::Entropy,
            seed: 101,
        }
    }
}

/// A fitted random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit an ensemble on a feature matrix and label vector
    pub fn fit(x: &Array2<f64>, y: &[bool], params: &ForestParams) -> Result<Self> {
        let n = x.nrows();
        if n == 0 || y.len() != n {
            return Err(ModelError::EmptyTrainingSet);
        }

        let features_per_split = (x.ncols() as f64).sqrt().round().max(1.0) as usize;
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            criterion: params.criterion,
            features_per_split,
        };

        let trees = (0..params.n_estimators)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let bootstrap: Vec<usize> =
                    (0..n).map(|_| rng.random_range(0..n)).collect();
                DecisionTree::fit(x.view(), y, bootstrap, &tree_params, &mut rng)
            })
            .collect();

        Ok(Self {
            params: params.clone(),
            trees,
        })
    }

    /// Majority-vote prediction for one feature vector
    ///
    /// Ties resolve to the negative class.
    pub fn predict_row(&self, features: &[f64]) -> bool {
        let positives = self
            .trees
            .iter()
            .filter(|t| t.predict_row(features))
            .count();
        positives * 2 > self.trees.len()
    }

    /// Predictions for every row of a feature matrix
    pub fn predict(&self, x: &Array2<f64>) -> Vec<bool> {
        x.rows()
            .into_iter()
            .map(|row| self.predict_row(&row.to_vec()))
            .collect()
    }

    /// The hyperparameters this forest was fitted with
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
