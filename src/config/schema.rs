//! Declared column schema for the ingested dataset
//!
//! The schema is loaded once from YAML at pipeline start and shared read-only
//! by the validation and transformation stages. It lists every expected column
//! with its declared type and domain constraint, names the target column, and
//! declares which numeric columns get which scaling treatment.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use super::error::{ConfigError, Result};

/// Declared type of a dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole-number values (counts, flags, ages)
    Integer,
    /// Real-valued measurements
    Float,
    /// String values drawn from a finite set
    Categorical,
}

/// A single column declaration: name, type, and domain constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in the source header
    pub name: String,
    /// Declared data type
    pub dtype: ColumnType,
    /// Whether every row must carry a non-empty value
    #[serde(default = "default_required")]
    pub required: bool,
    /// Lower bound for numeric columns (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numeric columns (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values for categorical columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

fn default_required() -> bool {
    true
}

/// Ordered column schema plus scaling declarations
///
/// Immutable once loaded. The column order matches the expected source header
/// order; validation reports columns by name, not position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Expected columns, in source order
    pub columns: Vec<ColumnSpec>,
    /// Name of the binary target column
    pub target_column: String,
    /// Numeric columns to standard-scale (zero mean, unit variance)
    #[serde(default)]
    pub standard_scale_columns: Vec<String>,
    /// Numeric columns to min-max scale into [0, 1]
    #[serde(default)]
    pub minmax_scale_columns: Vec<String>,
    /// Columns carried in the source but dropped before training (identifiers)
    #[serde(default)]
    pub drop_columns: Vec<String>,
}

impl Schema {
    /// Load a schema from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse a schema from a YAML string
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let schema: Schema = serde_yaml::from_str(raw)?;
        schema.check()?;
        Ok(schema)
    }

    /// Structural sanity checks on the declaration itself
    fn check(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        if self.column(&self.target_column).is_none() {
            return Err(ConfigError::UnknownColumn {
                column: self.target_column.clone(),
                role: "target_column",
            });
        }
        for (role, names) in [
            ("standard_scale_columns", &self.standard_scale_columns),
            ("minmax_scale_columns", &self.minmax_scale_columns),
            ("drop_columns", &self.drop_columns),
        ] {
            for name in names {
                if self.column(name).is_none() {
                    return Err(ConfigError::UnknownColumn {
                        column: name.clone(),
                        role,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a column declaration by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of all declared columns, in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Content digest of the declaration, recorded in trained bundles so a
    /// bundle can be tied back to the schema it was trained against
    pub fn digest(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }
}
