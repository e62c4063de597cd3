//! Preprocessing transform, estimator, metrics, and the trained bundle
//!
//! The transform and the forest only ever travel together: [`ModelBundle`] is
//! the single deployable unit the trainer produces, the registry stores, and
//! the predictor loads.

mod bundle;
mod error;
pub mod forest;
mod metrics;
mod preprocess;
mod tree;

pub use bundle::{extract_labels, BundleMetadata, ModelBundle};
pub use error::{ModelError, Result};
pub use forest::{ForestParams, RandomForest};
pub use metrics::{f1_score, BinaryConfusion};
pub use preprocess::{Preprocessor, FEATURE_NAMES};
pub use tree::{DecisionTree, SplitCriterion};
