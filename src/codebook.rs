//! Code Book: integer category codes to display labels.
//!
//! Labels are informational only. The classifier and the decision policy see
//! raw codes, so an unmapped code just renders as `UNKNOWN_LABEL`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::CodeDimension;

/// Label returned for codes with no entry.
pub const UNKNOWN_LABEL: &str = "Unknown";

const JOB: &[(i64, &str)] = &[
    (0, "High Qualification / Management"),
    (1, "Skilled Employee"),
    (2, "Unemployed / Unskilled (Non-resident)"),
    (3, "Unskilled (Resident)"),
];

const CHECKING_STATUS: &[(i64, &str)] = &[
    (0, "0 <= X < 200 DM (Medium Risk)"),
    (1, "< 0 DM (Overdrawn / High Risk)"),
    (2, ">= 200 DM (Low Risk)"),
    (3, "No Checking Account (Safe)"),
];

const SAVINGS_STATUS: &[(i64, &str)] = &[
    (0, "Little / None (<100 DM)"),
    (1, "Moderate (100-1000 DM)"),
    (2, "Substantial (>1000 DM)"),
];

// Indices follow the alphabetical order of the training categories.
const PURPOSE: &[(i64, &str)] = &[
    (0, "Business"),
    (1, "Domestic Appliances"),
    (2, "Education"),
    (3, "Furniture/Equipment"),
    (4, "New Car"),
    (5, "Used Car"),
    (6, "Radio/TV"),
    (7, "Repairs"),
    (8, "Retraining"),
];

/// Immutable code-to-label mapping, one table per dimension.
///
/// Serializes as `{dimension: {code: label}}` with codes ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeBook {
    tables: BTreeMap<CodeDimension, BTreeMap<i64, String>>,
}

impl CodeBook {
    /// The labels for the German credit feature encoding.
    pub fn standard() -> Self {
        let mut tables = BTreeMap::new();
        for dim in CodeDimension::ALL {
            let entries = match dim {
                CodeDimension::Job => JOB,
                CodeDimension::CheckingStatus => CHECKING_STATUS,
                CodeDimension::SavingsStatus => SAVINGS_STATUS,
                CodeDimension::Purpose => PURPOSE,
            };
            tables.insert(
                dim,
                entries.iter().map(|&(code, label)| (code, label.to_string())).collect(),
            );
        }
        Self { tables }
    }

    pub fn label(&self, dimension: CodeDimension, code: i64) -> &str {
        self.tables
            .get(&dimension)
            .and_then(|table| table.get(&code))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Known codes for a dimension, ascending.
    pub fn codes(&self, dimension: CodeDimension) -> Vec<i64> {
        self.tables
            .get(&dimension)
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn table(&self, dimension: CodeDimension) -> Option<&BTreeMap<i64, String>> {
        self.tables.get(&dimension)
    }
}

impl Default for CodeBook {
    fn default() -> Self {
        Self::standard()
    }
}
