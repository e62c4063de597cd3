//! Strongly-typed insurance record
//!
//! Raw rows are parsed into [`InsuranceRecord`] exactly once, at the
//! transformation boundary. Everything downstream of that boundary (the
//! preprocessing transform, the trainer, the predictor) consumes typed records
//! and never re-validates fields ad hoc.

use serde::{Deserialize, Serialize};

use super::error::{DataError, Result};
use super::table::Table;

/// Policyholder gender as carried by the source feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

/// Age bracket of the insured vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleAge {
    /// "< 1 Year"
    UnderOneYear,
    /// "1-2 Year"
    OneToTwoYears,
    /// "> 2 Years"
    OverTwoYears,
}

impl VehicleAge {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "< 1 Year" => Some(Self::UnderOneYear),
            "1-2 Year" => Some(Self::OneToTwoYears),
            "> 2 Years" => Some(Self::OverTwoYears),
            _ => None,
        }
    }
}

/// One labeled (or, at serving time, unlabeled) policyholder record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRecord {
    pub gender: Gender,
    pub age: u32,
    pub driving_license: bool,
    pub region_code: f64,
    pub previously_insured: bool,
    pub vehicle_age: VehicleAge,
    pub vehicle_damage: bool,
    pub annual_premium: f64,
    pub policy_sales_channel: f64,
    pub vintage: u32,
    /// Target label; absent on records arriving for prediction
    pub response: Option<bool>,
}

impl InsuranceRecord {
    /// Parse one raw table row into a typed record
    ///
    /// `row` is the row index within `table`, used both to fetch cells and to
    /// report the offending row on failure.
    pub fn from_row(table: &Table, row: usize) -> Result<Self> {
        let gender = match cell(table, row, "Gender")? {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            other => return Err(value_error("Gender", row, other, "Male or Female")),
        };

        let vehicle_age_raw = cell(table, row, "Vehicle_Age")?;
        let vehicle_age = VehicleAge::parse(vehicle_age_raw).ok_or_else(|| {
            value_error(
                "Vehicle_Age",
                row,
                vehicle_age_raw,
                "< 1 Year, 1-2 Year or > 2 Years",
            )
        })?;

        let vehicle_damage = match cell(table, row, "Vehicle_Damage")? {
            "Yes" => true,
            "No" => false,
            other => return Err(value_error("Vehicle_Damage", row, other, "Yes or No")),
        };

        // Response is part of the schema for training data but absent from
        // serving-time rows.
        let response = match table.value(row, "Response") {
            Some(raw) => Some(parse_flag("Response", row, raw)?),
            None => None,
        };

        Ok(Self {
            gender,
            age: parse_int("Age", row, cell(table, row, "Age")?)?,
            driving_license: parse_flag(
                "Driving_License",
                row,
                cell(table, row, "Driving_License")?,
            )?,
            region_code: parse_float("Region_Code", row, cell(table, row, "Region_Code")?)?,
            previously_insured: parse_flag(
                "Previously_Insured",
                row,
                cell(table, row, "Previously_Insured")?,
            )?,
            vehicle_age,
            vehicle_damage,
            annual_premium: parse_float(
                "Annual_Premium",
                row,
                cell(table, row, "Annual_Premium")?,
            )?,
            policy_sales_channel: parse_float(
                "Policy_Sales_Channel",
                row,
                cell(table, row, "Policy_Sales_Channel")?,
            )?,
            vintage: parse_int("Vintage", row, cell(table, row, "Vintage")?)?,
            response,
        })
    }

    /// Parse every row of a table
    pub fn from_table(table: &Table) -> Result<Vec<Self>> {
        (0..table.n_rows()).map(|i| Self::from_row(table, i)).collect()
    }
}

fn cell<'t>(table: &'t Table, row: usize, column: &str) -> Result<&'t str> {
    table
        .value(row, column)
        .ok_or_else(|| DataError::MissingColumn(column.to_string()))
}

fn value_error(column: &str, row: usize, value: &str, expected: &'static str) -> DataError {
    DataError::Value {
        column: column.to_string(),
        row,
        value: value.to_string(),
        expected,
    }
}

fn parse_int(column: &str, row: usize, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| value_error(column, row, raw, "an integer"))
}

fn parse_float(column: &str, row: usize, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| value_error(column, row, raw, "a number"))
}

fn parse_flag(column: &str, row: usize, raw: &str) -> Result<bool> {
    match raw.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(value_error(column, row, raw, "0 or 1")),
    }
}
