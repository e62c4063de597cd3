//! CLI for asegurar
//!
//! Three commands: `train` runs the full pipeline against a CSV-backed
//! source, `predict` scores a single record with the deployed model, and
//! `versions` lists the registry's audit trail.

mod commands;

pub use commands::run_command;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

/// Command-line interface
#[derive(Debug, Parser)]
#[command(name = "asegurar", version, about = "Vehicle-insurance response training pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the staged training pipeline
    Train {
        /// CSV file backing the source collection
        #[arg(long)]
        data: PathBuf,
        /// Column schema YAML file
        #[arg(long, default_value = "config/schema.yaml")]
        schema: PathBuf,
        /// Pipeline config YAML; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Predict the response for one record using the deployed model
    Predict {
        /// Pipeline config YAML; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Male or Female
        #[arg(long)]
        gender: String,
        #[arg(long)]
        age: u32,
        /// 1 if the customer holds a driving license
        #[arg(long)]
        driving_license: u8,
        #[arg(long)]
        region_code: f64,
        /// 1 if the customer already holds vehicle insurance
        #[arg(long)]
        previously_insured: u8,
        /// One of: "< 1 Year", "1-2 Year", "> 2 Years"
        #[arg(long)]
        vehicle_age: String,
        /// Yes or No
        #[arg(long)]
        vehicle_damage: String,
        #[arg(long)]
        annual_premium: f64,
        #[arg(long)]
        policy_sales_channel: f64,
        #[arg(long)]
        vintage: u32,
    },
    /// List stored model versions, newest first
    Versions {
        /// Pipeline config YAML; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// CLI-level errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] crate::error::Error),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    #[error(transparent)]
    Predictor(#[from] crate::predict::PredictorError),

    #[error("invalid {field}: {value:?} ({hint})")]
    InvalidField {
        field: &'static str,
        value: String,
        hint: &'static str,
    },
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
