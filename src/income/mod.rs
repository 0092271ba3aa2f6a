//! County income-threshold table and income-ratio computation.
//!
//! The table maps (county, household size) to the exact 100% AMI/SMI/FPL
//! dollar values for the program year. A missing row is a soft error the
//! caller decides how to handle; it is never papered over with a default.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Household income expressed against the three program benchmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeProfile {
    pub ami_percent: u16,
    pub smi_percent: u16,
    pub fpl_percent: u16,
    pub household_size: u8,
    pub county: String,
}

/// One row of the threshold table: 100% benchmark values in dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRow {
    pub county: String,
    pub household_size: u8,
    pub ami_100: u32,
    pub smi_100: u32,
    pub fpl_100: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum IncomeDataError {
    #[error("failed to read income thresholds from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed income threshold row: {0}")]
    Csv(#[from] csv::Error),
}

/// Lookup miss for a county/household-size pair the table does not cover.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no income threshold data for {county}, household size {household_size}")]
pub struct ThresholdLookupError {
    pub county: String,
    pub household_size: u8,
}

/// Threshold table indexed by county and household size.
#[derive(Debug, Clone, Default)]
pub struct IncomeThresholdTable {
    rows: HashMap<(String, u8), ThresholdRow>,
}

impl IncomeThresholdTable {
    pub fn from_rows(rows: impl IntoIterator<Item = ThresholdRow>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| ((row.county.clone(), row.household_size), row))
            .collect();
        Self { rows }
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, IncomeDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for record in csv_reader.deserialize() {
            let row: ThresholdRow = record?;
            rows.push(row);
        }
        Ok(Self::from_rows(rows))
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, IncomeDataError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IncomeDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fetch the thresholds for a county and household size. A trailing
    /// " County" suffix on the county name is accepted.
    pub fn lookup(&self, county: &str, household_size: u8) -> Option<&ThresholdRow> {
        let key = normalize_county(county);
        self.rows.get(&(key, household_size))
    }

    /// Compute income percentages against the exact 100% benchmark values.
    pub fn income_profile(
        &self,
        annual_income: u32,
        county: &str,
        household_size: u8,
    ) -> Result<IncomeProfile, ThresholdLookupError> {
        let row = self
            .lookup(county, household_size)
            .ok_or_else(|| ThresholdLookupError {
                county: county.to_string(),
                household_size,
            })?;

        Ok(IncomeProfile {
            ami_percent: percent_of(annual_income, row.ami_100),
            smi_percent: percent_of(annual_income, row.smi_100),
            fpl_percent: percent_of(annual_income, row.fpl_100),
            household_size,
            county: row.county.clone(),
        })
    }
}

fn normalize_county(county: &str) -> String {
    county.trim().trim_end_matches(" County").to_string()
}

fn percent_of(income: u32, benchmark: u32) -> u16 {
    if benchmark == 0 {
        return 0;
    }
    (income as f64 / benchmark as f64 * 100.0).round() as u16
}
