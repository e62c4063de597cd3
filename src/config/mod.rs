//! Schema and pipeline configuration
//!
//! Two YAML surfaces: the column [`Schema`] consumed by validation and
//! transformation, and the [`PipelineSpec`] tunables resolved into a
//! [`PipelineConfig`] once per run.

mod error;
mod pipeline;
mod schema;

pub use error::{ConfigError, Result};
pub use pipeline::{
    EvaluationConfig, IngestionConfig, PipelineConfig, PipelineSpec, PusherConfig,
    TrainerConfig, TransformationConfig, ValidationConfig, ValidationPolicy,
};
pub use schema::{ColumnSpec, ColumnType, Schema};
