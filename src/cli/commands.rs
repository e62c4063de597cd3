//! CLI command handlers

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{Cli, CliError, Command, Result};
use crate::config::{PipelineConfig, PipelineSpec, Schema};
use crate::data::{CsvSource, Gender, InsuranceRecord, VehicleAge};
use crate::registry::{LocalRegistry, ModelRegistry};
use crate::{ResponsePredictor, TrainingPipeline};

/// Dispatch a parsed CLI invocation
pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Train {
            data,
            schema,
            config,
        } => train(&data, &schema, config.as_deref()),
        Command::Predict {
            config,
            gender,
            age,
            driving_license,
            region_code,
            previously_insured,
            vehicle_age,
            vehicle_damage,
            annual_premium,
            policy_sales_channel,
            vintage,
        } => {
            let record = build_record(
                &gender,
                age,
                driving_license,
                region_code,
                previously_insured,
                &vehicle_age,
                &vehicle_damage,
                annual_premium,
                policy_sales_channel,
                vintage,
            )?;
            predict(config.as_deref(), &record)
        }
        Command::Versions { config } => versions(config.as_deref()),
    }
}

fn load_spec(config: Option<&Path>) -> Result<PipelineSpec> {
    match config {
        Some(path) => Ok(PipelineSpec::from_yaml_file(path)?),
        None => Ok(PipelineSpec::default()),
    }
}

fn train(data: &Path, schema_path: &Path, config: Option<&Path>) -> Result<()> {
    let schema = Schema::from_yaml_file(schema_path)?;
    let spec = load_spec(config)?;

    let run_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let pipeline_config = PipelineConfig::for_run(&spec, &run_id)?;
    let run_dir: PathBuf = pipeline_config.run_dir.clone();

    let source = CsvSource::new(spec.source_collection.clone(), data);
    let registry = LocalRegistry::open(&spec.registry_root)?;

    let mut pipeline = TrainingPipeline::new(source, registry, schema, pipeline_config);
    let pushed = pipeline.run_pipeline().map_err(CliError::Pipeline)?;

    println!("✓ Training pipeline complete");
    println!("  Run artifacts: {}", run_dir.display());
    match pushed.version {
        Some(version) => println!(
            "  Pushed model version {} under {} ({} bytes)",
            version.version, version.key, version.size
        ),
        None => println!("  Challenger not promoted; registry unchanged"),
    }
    Ok(())
}

fn predict(config: Option<&Path>, record: &InsuranceRecord) -> Result<()> {
    let spec = load_spec(config)?;
    let registry = LocalRegistry::open(&spec.registry_root)?;
    let predictor = ResponsePredictor::from_registry(&registry, &spec.bundle_key)?;

    println!("{}", predictor.predict(record));
    Ok(())
}

fn versions(config: Option<&Path>) -> Result<()> {
    let spec = load_spec(config)?;
    let registry = LocalRegistry::open(&spec.registry_root)?;

    let versions = registry.list_versions(&spec.bundle_key)?;
    println!("Versions under {} (newest first):", spec.bundle_key);
    for v in versions {
        let marker = if v.is_latest { " (latest)" } else { "" };
        println!(
            "  v{}  {}  {} bytes  {}…{}",
            v.version,
            v.created_at.format("%Y-%m-%d %H:%M:%S"),
            v.size,
            &v.digest[..8],
            marker
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_record(
    gender: &str,
    age: u32,
    driving_license: u8,
    region_code: f64,
    previously_insured: u8,
    vehicle_age: &str,
    vehicle_damage: &str,
    annual_premium: f64,
    policy_sales_channel: f64,
    vintage: u32,
) -> Result<InsuranceRecord> {
    let gender = match gender {
        "Male" => Gender::Male,
        "Female" => Gender::Female,
        other => {
            return Err(CliError::InvalidField {
                field: "gender",
                value: other.to_string(),
                hint: "expected Male or Female",
            })
        }
    };
    let vehicle_age = match vehicle_age {
        "< 1 Year" => VehicleAge::UnderOneYear,
        "1-2 Year" => VehicleAge::OneToTwoYears,
        "> 2 Years" => VehicleAge::OverTwoYears,
        other => {
            return Err(CliError::InvalidField {
                field: "vehicle_age",
                value: other.to_string(),
                hint: "expected \"< 1 Year\", \"1-2 Year\" or \"> 2 Years\"",
            })
        }
    };
    let vehicle_damage = match vehicle_damage {
        "Yes" => true,
        "No" => false,
        other => {
            return Err(CliError::InvalidField {
                field: "vehicle_damage",
                value: other.to_string(),
                hint: "expected Yes or No",
            })
        }
    };

    Ok(InsuranceRecord {
        gender,
        age,
        driving_license: driving_license != 0,
        region_code,
        previously_insured: previously_insured != 0,
        vehicle_age,
        vehicle_damage,
        annual_premium,
        policy_sales_channel,
        vintage,
        response: None,
    })
}
