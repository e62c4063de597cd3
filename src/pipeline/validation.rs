//! Data validation stage
//!
//! Checks the ingested splits against the declared schema: every expected
//! column present, observed values conforming to declared type and domain, no
//! unexpected columns drifting into the feed, and a non-empty test partition.
//! Violations are collected into the artifact and a YAML report file; whether
//! they abort the chain is the orchestrator's call.

use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;
use tracing::info;

use super::artifact::{IngestionArtifact, ValidationArtifact};
use crate::config::{ColumnSpec, ColumnType, Schema, ValidationConfig};
use crate::data::{DataError, Table};

/// Validation stage errors
///
/// These cover failures to *perform* validation; rule violations themselves
/// are data, carried in the artifact.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize validation report: {0}")]
    Report(#[from] serde_yaml::Error),
}

/// Result type for the validation stage
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Report persisted alongside the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValidationReport {
    is_valid: bool,
    train_rows: usize,
    test_rows: usize,
    violations: Vec<String>,
}

/// Data validation component
pub struct DataValidation<'a> {
    schema: &'a Schema,
    config: ValidationConfig,
}

impl<'a> DataValidation<'a> {
    pub fn new(schema: &'a Schema, config: ValidationConfig) -> Self {
        Self { schema, config }
    }

    /// Validate both ingested splits against the schema
    pub fn run(&self, ingestion: &IngestionArtifact) -> Result<ValidationArtifact> {
        let train = Table::from_csv_path(&ingestion.train_path)?;
        let test = Table::from_csv_path(&ingestion.test_path)?;

        let mut violations = Vec::new();
        if test.n_rows() == 0 {
            violations.push("test split is empty after ingestion".to_string());
        }
        check_split(self.schema, &train, "train", &mut violations);
        check_split(self.schema, &test, "test", &mut violations);

        let is_valid = violations.is_empty();
        let report = ValidationReport {
            is_valid,
            train_rows: train.n_rows(),
            test_rows: test.n_rows(),
            violations: violations.clone(),
        };
        write_report(&report, &self.config.report_path)?;

        info!(
            is_valid,
            violation_count = violations.len(),
            report = %self.config.report_path.display(),
            "data validation complete"
        );

        Ok(ValidationArtifact {
            is_valid,
            violations,
            report_path: self.config.report_path.clone(),
        })
    }
}

fn write_report(report: &ValidationReport, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = serde_yaml::to_string(report)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(raw.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Run every schema rule against one split
fn check_split(schema: &Schema, table: &Table, split: &str, violations: &mut Vec<String>) {
    for header in table.headers() {
        if schema.column(header).is_none() {
            violations.push(format!("{split}: unexpected column {header}"));
        }
    }

    for spec in &schema.columns {
        let Some(col) = table.column_index(&spec.name) else {
            violations.push(format!("{split}: missing column {}", spec.name));
            continue;
        };
        check_column(spec, table, col, split, violations);
    }
}

/// Type and domain checks for one declared column
fn check_column(
    spec: &ColumnSpec,
    table: &Table,
    col: usize,
    split: &str,
    violations: &mut Vec<String>,
) {
    let mut bad_type = 0usize;
    let mut out_of_domain = 0usize;
    let mut empty = 0usize;
    let mut first_bad: Option<(usize, String)> = None;

    for (row, cells) in table.rows().iter().enumerate() {
        let raw = cells.get(col).map(String::as_str).unwrap_or("");
        if raw.trim().is_empty() {
            if spec.required {
                empty += 1;
            }
            continue;
        }

        let parsed = match spec.dtype {
            ColumnType::Integer => raw.trim().parse::<i64>().map(|v| v as f64).ok(),
            ColumnType::Float => raw.trim().parse::<f64>().ok(),
            ColumnType::Categorical => {
                match &spec.allowed {
                    Some(allowed) if !allowed.iter().any(|a| a == raw.trim()) => {
                        out_of_domain += 1;
                        if first_bad.is_none() {
                            first_bad = Some((row, raw.to_string()));
                        }
                    }
                    _ => {}
                }
                continue;
            }
        };

        match parsed {
            None => {
                bad_type += 1;
                if first_bad.is_none() {
                    first_bad = Some((row, raw.to_string()));
                }
            }
            Some(value) => {
                let below = spec.min.is_some_and(|min| value < min);
                let above = spec.max.is_some_and(|max| value > max);
                if below || above {
                    out_of_domain += 1;
                    if first_bad.is_none() {
                        first_bad = Some((row, raw.to_string()));
                    }
                }
            }
        }
    }

    let example = |first_bad: &Option<(usize, String)>| {
        first_bad
            .as_ref()
            .map(|(row, value)| format!(" (first at row {row}: {value:?})"))
            .unwrap_or_default()
    };

    if bad_type > 0 {
        violations.push(format!(
            "{split}: column {} has {bad_type} value(s) not matching declared type{}",
            spec.name,
            example(&first_bad)
        ));
    }
    if out_of_domain > 0 {
        violations.push(format!(
            "{split}: column {} has {out_of_domain} value(s) outside its domain{}",
            spec.name,
            example(&first_bad)
        ));
    }
    if empty > 0 {
        violations.push(format!(
            "{split}: required column {} has {empty} empty value(s)",
            spec.name
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn schema() -> Schema {
        Schema::from_yaml(
            r#"
target_column: Response
columns:
  - name: Age
    dtype: integer
    min: 18
    max: 110
  - name: Gender
    dtype: categorical
    allowed: [Male, Female]
  - name: Response
    dtype: integer
    min: 0
    max: 1
"#,
        )
        .unwrap()
    }

    fn write_split(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn artifact(dir: &std::path::Path, train: &str, test: &str) -> IngestionArtifact {
        let train_path = write_split(dir, "train.csv", train);
        let test_path = write_split(dir, "test.csv", test);
        let train_rows = train.lines().count() - 1;
        let test_rows = test.lines().count() - 1;
        IngestionArtifact {
            feature_store_path: dir.join("data.csv"),
            train_path,
            test_path,
            train_rows,
            test_rows,
        }
    }

    fn run(dir: &TempDir, train: &str, test: &str) -> ValidationArtifact {
        let schema = schema();
        let config = ValidationConfig {
            report_path: dir.path().join("report.yaml"),
            policy: crate::config::ValidationPolicy::Abort,
        };
        DataValidation::new(&schema, config)
            .run(&artifact(dir.path(), train, test))
            .unwrap()
    }

    const GOOD: &str = "Age,Gender,Response\n44,Male,1\n25,Female,0\n";

    #[test]
    fn test_conforming_data_is_valid() {
        let tmp = TempDir::new().unwrap();
        let result = run(&tmp, GOOD, GOOD);
        assert!(result.is_valid);
        assert!(result.violations.is_empty());
        assert!(result.report_path.exists());
    }

    #[test]
    fn test_non_numeric_value_names_column() {
        let tmp = TempDir::new().unwrap();
        let bad = "Age,Gender,Response\nforty,Male,1\n25,Female,0\n";
        let result = run(&tmp, bad, GOOD);
        assert!(!result.is_valid);
        assert!(
            result.violations.iter().any(|v| v.contains("Age")),
            "violations: {:?}",
            result.violations
        );
    }

    #[test]
    fn test_out_of_domain_value_reported() {
        let tmp = TempDir::new().unwrap();
        let bad = "Age,Gender,Response\n150,Male,1\n25,Female,0\n";
        let result = run(&tmp, bad, GOOD);
        assert!(!result.is_valid);
        assert!(result.violations.iter().any(|v| v.contains("domain")));
    }

    #[test]
    fn test_unknown_category_reported() {
        let tmp = TempDir::new().unwrap();
        let bad = "Age,Gender,Response\n44,Other,1\n";
        let result = run(&tmp, bad, GOOD);
        assert!(!result.is_valid);
        assert!(result.violations.iter().any(|v| v.contains("Gender")));
    }

    #[test]
    fn test_missing_column_reported() {
        let tmp = TempDir::new().unwrap();
        let bad = "Age,Response\n44,1\n";
        let result = run(&tmp, bad, GOOD);
        assert!(!result.is_valid);
        assert!(result
            .violations
            .iter()
            .any(|v| v.contains("missing column Gender")));
    }

    #[test]
    fn test_unexpected_column_reported() {
        let tmp = TempDir::new().unwrap();
        let drifted = "Age,Gender,Response,Extra\n44,Male,1,x\n";
        let result = run(&tmp, drifted, GOOD);
        assert!(!result.is_valid);
        assert!(result
            .violations
            .iter()
            .any(|v| v.contains("unexpected column Extra")));
    }

    #[test]
    fn test_empty_test_split_is_violation() {
        let tmp = TempDir::new().unwrap();
        let empty_test = "Age,Gender,Response\n";
        let result = run(&tmp, GOOD, empty_test);
        assert!(!result.is_valid);
        assert!(result
            .violations
            .iter()
            .any(|v| v.contains("test split is empty")));
    }

    #[test]
    fn test_required_empty_cell_reported() {
        let tmp = TempDir::new().unwrap();
        let bad = "Age,Gender,Response\n,Male,1\n";
        let result = run(&tmp, bad, GOOD);
        assert!(!result.is_valid);
        assert!(result.violations.iter().any(|v| v.contains("empty value")));
    }

    #[test]
    fn test_report_file_round_trips() {
        let tmp = TempDir::new().unwrap();
        let result = run(&tmp, GOOD, GOOD);
        let raw = std::fs::read_to_string(&result.report_path).unwrap();
        let report: ValidationReport = serde_yaml::from_str(&raw).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.train_rows, 2);
    }
}
