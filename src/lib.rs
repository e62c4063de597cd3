//! # asegurar
//!
//! Staged training pipeline and versioned model registry for
//! vehicle-insurance response prediction.
//!
//! The pipeline runs six stages in fixed order — ingestion, validation,
//! transformation, training, evaluation, push — threading an artifact chain
//! from stage to stage and aborting at the first failure. An accepted model
//! ships as a [`ModelBundle`](model::ModelBundle): the estimator and its
//! paired preprocessing transform, stored as one atomic unit in an
//! append-only, versioned [registry](registry) with an atomically flipped
//! latest pointer. Promotion is conservative: a challenger replaces
//! production only when it beats it by a configured margin on the identical
//! held-out test split.
//!
//! # Example
//!
//! ```no_run
//! use asegurar::config::{PipelineConfig, PipelineSpec, Schema};
//! use asegurar::data::CsvSource;
//! use asegurar::registry::LocalRegistry;
//! use asegurar::TrainingPipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::from_yaml_file("config/schema.yaml")?;
//! let spec = PipelineSpec::default();
//! let config = PipelineConfig::for_run(&spec, "20250101_120000")?;
//!
//! let source = CsvSource::new(spec.source_collection.clone(), "data/feed.csv");
//! let registry = LocalRegistry::open(&spec.registry_root)?;
//!
//! let mut pipeline = TrainingPipeline::new(source, registry, schema, config);
//! let pushed = pipeline.run_pipeline()?;
//! println!("pushed: {}", pushed.pushed);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod predict;
pub mod registry;

pub use error::{Error, Result};
pub use pipeline::TrainingPipeline;
pub use predict::{Response, ResponsePredictor};
