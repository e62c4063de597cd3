//! Entropy-criterion decision tree
//!
//! The base learner of the ensemble. Trees are grown greedily: at each node a
//! random subset of features is considered, candidate thresholds are midpoints
//! between adjacent observed values, and the split with the largest impurity
//! decrease wins. Growth stops on purity, depth, or the minimum split/leaf
//! sizes.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Impurity measure used to pick splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitCriterion {
    /// Shannon entropy
    #[default]
    Entropy,
    /// Gini impurity
    Gini,
}

impl SplitCriterion {
    /// Impurity of a node holding `positives` positive labels out of `total`
    pub fn impurity(self, positives: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let p = positives as f64 / total as f64;
        match self {
            SplitCriterion::Entropy => {
                let mut h = 0.0;
                for q in [p, 1.0 - p] {
                    if q > 0.0 {
                        h -= q * q.log2();
                    }
                }
                h
            }
            SplitCriterion::Gini => 2.0 * p * (1.0 - p),
        }
    }
}

/// Growth limits shared by every tree in a forest
#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub criterion: SplitCriterion,
    /// Number of features considered per split
    pub features_per_split: usize,
}

/// Tree node: either a class prediction or a threshold split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        prediction: bool,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Grow a tree over the given sample indices
    ///
    /// `indices` selects the (possibly repeated, for bootstrap samples) rows
    /// of `x`/`y` this tree trains on.
    pub fn fit(
        x: ArrayView2<'_, f64>,
        y: &[bool],
        indices: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            root: grow(x, y, indices, 0, params, rng),
        }
    }

    /// Predict the class of one feature vector
    pub fn predict_row(&self, features: &[f64]) -> bool {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { prediction } => return *prediction,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn majority(y: &[bool], indices: &[usize]) -> bool {
    let positives = indices.iter().filter(|&&i| y[i]).count();
    // ties resolve to the negative class
    positives * 2 > indices.len()
}

fn grow(
    x: ArrayView2<'_, f64>,
    y: &[bool],
    indices: Vec<usize>,
    depth: usize,
    params: &TreeParams,
    rng: &mut StdRng,
) -> Node {
    let positives = indices.iter().filter(|&&i| y[i]).count();
    let pure = positives == 0 || positives == indices.len();

    if pure || depth >= params.max_depth || indices.len() < params.min_samples_split {
        return Node::Leaf {
            prediction: majority(y, &indices),
        };
    }

    match best_split(x, y, &indices, params, rng) {
        Some((feature, threshold, left_idx, right_idx)) => Node::Split {
            feature,
            threshold,
            left: Box::new(grow(x, y, left_idx, depth + 1, params, rng)),
            right: Box::new(grow(x, y, right_idx, depth + 1, params, rng)),
        },
        None => Node::Leaf {
            prediction: majority(y, &indices),
        },
    }
}

type Split = (usize, f64, Vec<usize>, Vec<usize>);

/// Pick the impurity-minimizing split over a random feature subset
fn best_split(
    x: ArrayView2<'_, f64>,
    y: &[bool],
    indices: &[usize],
    params: &TreeParams,
    rng: &mut StdRng,
) -> Option<Split> {
    let n_features = x.ncols();
    let k = params.features_per_split.clamp(1, n_features);
    let candidates = rand::seq::index::sample(rng, n_features, k);

    let parent_impurity = params.criterion.impurity(
        indices.iter().filter(|&&i| y[i]).count(),
        indices.len(),
    );

    let mut best: Option<(f64, Split)> = None;

    for feature in candidates {
        let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature]]).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        if values.len() < 2 {
            continue;
        }

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left = Vec::new();
            let mut right = Vec::new();
            for &i in indices {
                if x[[i, feature]] <= threshold {
                    left.push(i);
                } else {
                    right.push(i);
                }
            }
            if left.len() < params.min_samples_leaf || right.len() < params.min_samples_leaf {
                continue;
            }

            let left_pos = left.iter().filter(|&&i| y[i]).count();
            let right_pos = right.iter().filter(|&&i| y[i]).count();
            let weighted = (left.len() as f64 * params.criterion.impurity(left_pos, left.len())
                + right.len() as f64 * params.criterion.impurity(right_pos, right.len()))
                / indices.len() as f64;

            if weighted + 1e-12 >= parent_impurity {
                continue;
            }
            let improved = match &best {
                Some((best_weighted, _)) => weighted < *best_weighted,
                None => true,
            };
            if improved {
                best = Some((weighted, (feature, threshold, left, right)));
            }
        }
    }

    best.map(|(_, split)| split)
}
