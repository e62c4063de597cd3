//! Fitted preprocessing transform
//!
//! Encodes typed records into the numeric feature layout the estimator
//! consumes: categorical fields become indicator columns (the vehicle-age
//! bracket expands to two indicators), numeric fields are scaled with
//! parameters fitted on the training split only. The fitted object is
//! serialized next to the estimator and shipped with it as one bundle, so a
//! serving-time record goes through exactly the transform the model was
//! trained against.
//!
//! Applying a fitted transform is pure: the same input always yields the same
//! output. Only `fit` looks at data.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::error::{ModelError, Result};
use crate::config::Schema;
use crate::data::{Gender, InsuranceRecord, VehicleAge};

/// Feature layout produced by the transform, in column order
pub const FEATURE_NAMES: [&str; 11] = [
    "Gender",
    "Age",
    "Driving_License",
    "Region_Code",
    "Previously_Insured",
    "Annual_Premium",
    "Policy_Sales_Channel",
    "Vintage",
    "Vehicle_Age_lt_1_Year",
    "Vehicle_Age_gt_2_Years",
    "Vehicle_Damage_Yes",
];

/// Standard-scaling parameters for one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StandardParam {
    feature: usize,
    mean: f64,
    std: f64,
}

/// Min-max parameters for one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MinMaxParam {
    feature: usize,
    min: f64,
    max: f64,
}

/// A preprocessing transform fitted on a training split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    standard: Vec<StandardParam>,
    minmax: Vec<MinMaxParam>,
}

impl Preprocessor {
    /// Fit scaling parameters on the training records
    ///
    /// The schema declares which columns get which scaling; a declared column
    /// that is not part of the feature layout is a schema/transform mismatch.
    pub fn fit(records: &[InsuranceRecord], schema: &Schema) -> Result<Self> {
        if records.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mut standard = Vec::new();
        for column in &schema.standard_scale_columns {
            let feature = feature_index(column)?;
            let values: Vec<f64> = records.iter().map(|r| raw_features(r)[feature]).collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            standard.push(StandardParam {
                feature,
                mean,
                std: variance.sqrt(),
            });
        }

        let mut minmax = Vec::new();
        for column in &schema.minmax_scale_columns {
            let feature = feature_index(column)?;
            let values: Vec<f64> = records.iter().map(|r| raw_features(r)[feature]).collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            minmax.push(MinMaxParam { feature, min, max });
        }

        Ok(Self { standard, minmax })
    }

    /// Encode and scale one record into a feature vector
    pub fn transform_record(&self, record: &InsuranceRecord) -> Vec<f64> {
        let mut features = raw_features(record).to_vec();
        for param in &self.standard {
            let denom = if param.std > 0.0 { param.std } else { 1.0 };
            features[param.feature] = (features[param.feature] - param.mean) / denom;
        }
        for param in &self.minmax {
            let span = param.max - param.min;
            features[param.feature] = if span > 0.0 {
                (features[param.feature] - param.min) / span
            } else {
                0.0
            };
        }
        features
    }

    /// Encode and scale a batch of records into a feature matrix
    pub fn transform(&self, records: &[InsuranceRecord]) -> Array2<f64> {
        let mut matrix = Array2::zeros((records.len(), FEATURE_NAMES.len()));
        for (i, record) in records.iter().enumerate() {
            let features = self.transform_record(record);
            for (j, value) in features.into_iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }

    /// Names of the produced feature columns, in order
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

/// Raw (unscaled) encoding of one record, in [`FEATURE_NAMES`] order
fn raw_features(record: &InsuranceRecord) -> [f64; 11] {
    [
        match record.gender {
            Gender::Female => 0.0,
            Gender::Male => 1.0,
        },
        f64::from(record.age),
        f64::from(u8::from(record.driving_license)),
        record.region_code,
        f64::from(u8::from(record.previously_insured)),
        record.annual_premium,
        record.policy_sales_channel,
        f64::from(record.vintage),
        f64::from(u8::from(record.vehicle_age == VehicleAge::UnderOneYear)),
        f64::from(u8::from(record.vehicle_age == VehicleAge::OverTwoYears)),
        f64::from(u8::from(record.vehicle_damage)),
    ]
}

fn feature_index(column: &str) -> Result<usize> {
    FEATURE_NAMES
        .iter()
        .position(|&f| f == column)
        .ok_or_else(|| ModelError::UnknownColumn(column.to_string()))
}
