#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{validate_non_negative, validate_text};
use crate::factor::EmissionFactor;
use crate::{ContractViolation, Validate};

/// Provenance of the factor a result was computed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFactor {
    pub id: Option<String>,
    pub value: f64,
    pub units: String,
    pub source: Option<String>,
    pub region: Option<String>,
    pub vintage: Option<String>,
}

impl From<&EmissionFactor> for AppliedFactor {
    fn from(f: &EmissionFactor) -> Self {
        Self {
            id: f.id.clone(),
            value: f.value,
            units: f.units.clone(),
            source: f.source.clone(),
            region: f.region.clone(),
            vintage: f.vintage.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(rename = "activityType")]
    pub activity_type: String,
    pub input_quantity: f64,
    pub input_units: String,
    pub standardized_quantity: f64,
    pub standardized_units: String,
    pub factor: AppliedFactor,
    #[serde(rename = "calculated_kgCO2e")]
    pub calculated_kg_co2e: f64,
    pub notes: Vec<String>,
}

impl Validate for CalculationResult {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text(
            "calculation_result.activity_type",
            &self.activity_type,
            64,
        )?;
        validate_non_negative("calculation_result.input_quantity", self.input_quantity)?;
        validate_non_negative(
            "calculation_result.standardized_quantity",
            self.standardized_quantity,
        )?;
        validate_non_negative("calculation_result.factor.value", self.factor.value)?;
        validate_non_negative(
            "calculation_result.calculated_kg_co2e",
            self.calculated_kg_co2e,
        )?;
        Ok(())
    }
}

/// Per-item failure recorded inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub success: bool,
    pub error: String,
    #[serde(rename = "activityType")]
    pub activity_type: String,
}

impl BatchFailure {
    pub fn new(activity_type: &str, error: String) -> Self {
        Self {
            success: false,
            error,
            activity_type: activity_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Calculated(CalculationResult),
    Failed(BatchFailure),
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchEntry::Calculated(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(rename = "total_kgCO2e")]
    pub total_kg_co2e: f64,
    #[serde(rename = "byCategory")]
    pub by_category: BTreeMap<String, f64>,
    pub results: Vec<BatchEntry>,
}

impl BatchResult {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }
}
