#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use carbon_kernel_contracts::factor::EmissionFactor;
use carbon_kernel_contracts::{ContractViolation, Validate};
use thiserror::Error;

use crate::factor_store::FactorStore;

pub const DEFAULT_TABLE_SOURCE: &str = "carbon default factor table";
pub const DEFAULT_TABLE_VINTAGE: &str = "2024";

#[derive(Debug, Error)]
pub enum FactorTableError {
    #[error("failed to read factor table '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse factor table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid factor row: {0}")]
    Invalid(#[from] ContractViolation),
}

// (category, subtype, units, value, region)
const DEFAULT_ROWS: &[(&str, &str, &str, f64, &str)] = &[
    ("transportation", "car", "kgCO2_per_passenger_mile", 0.21, "IN_Delhi"),
    ("transportation", "car", "kgCO2_per_passenger_mile", 0.19, "IN"),
    ("transportation", "bus", "kgCO2_per_passenger_mile", 0.045, "IN_Delhi"),
    ("transportation", "bus", "kgCO2_per_passenger_mile", 0.05, "IN"),
    ("transportation", "train", "kgCO2_per_passenger_mile", 0.025, "IN"),
    ("transportation", "subway", "kgCO2_per_passenger_mile", 0.03, "IN_Delhi"),
    ("transportation", "motorcycle", "kgCO2_per_passenger_mile", 0.09, "IN"),
    ("transportation", "rideshare", "kgCO2_per_passenger_mile", 0.25, "IN_Delhi"),
    ("transportation", "flight_shorthaul_economy", "kgCO2e_per_pkm", 0.151, "Global"),
    ("transportation", "flight_longhaul_economy", "kgCO2e_per_pkm", 0.148, "Global"),
    ("energy", "electricity", "kgCO2e_per_kWh", 0.82, "IN"),
    ("energy", "electricity", "kgCO2e_per_kWh", 0.386, "US"),
    ("energy", "electricity", "kgCO2e_per_kWh", 0.207, "GB"),
    ("energy", "electricity", "kgCO2e_per_kWh", 0.475, "Global"),
    ("energy", "natural_gas", "kgCO2e_per_therms", 5.3, "Global"),
    ("energy", "heating_oil", "kgCO2e_per_gallon", 10.16, "Global"),
    ("energy", "lpg", "kgCO2e_per_gallon", 5.68, "Global"),
    ("food", "beef", "kgCO2e_per_lb", 12.25, "Global"),
    ("food", "lamb", "kgCO2e_per_lb", 10.67, "Global"),
    ("food", "cheese", "kgCO2e_per_lb", 6.17, "Global"),
    ("food", "pork", "kgCO2e_per_lb", 5.49, "Global"),
    ("food", "chicken", "kgCO2e_per_lb", 3.11, "Global"),
    ("food", "fish", "kgCO2e_per_lb", 2.72, "Global"),
    ("food", "eggs", "kgCO2e_per_lb", 2.18, "Global"),
    ("food", "dairy", "kgCO2e_per_lb", 1.43, "Global"),
    ("food", "rice", "kgCO2e_per_lb", 1.22, "Global"),
    ("food", "grains", "kgCO2e_per_lb", 0.63, "Global"),
    ("food", "vegetables", "kgCO2e_per_lb", 0.91, "Global"),
    ("food", "fruit", "kgCO2e_per_lb", 0.5, "Global"),
    ("waste", "landfill", "kgCO2e_per_kg", 0.58, "Default"),
    ("waste", "landfill", "kgCO2e_per_kg", 0.7, "IN"),
    ("waste", "recycling", "kgCO2e_per_kg", 0.021, "Default"),
    ("waste", "compost", "kgCO2e_per_kg", 0.01, "Default"),
    ("water", "shower", "kgCO2e_per_minute", 0.0085, "IN"),
    // dishwasher, laundry and tap all land on this row through the
    // compatible-denominator step.
    ("water", "treatment", "kgCO2e_per_gallon", 0.0034, "IN"),
    ("shopping", "clothing", "kgCO2e_per_item", 15.0, "Global"),
    ("shopping", "electronics", "kgCO2e_per_item", 70.0, "Global"),
    ("shopping", "furniture", "kgCO2e_per_item", 90.0, "Global"),
];

pub fn default_factors() -> Vec<EmissionFactor> {
    DEFAULT_ROWS
        .iter()
        .map(|&(category, subtype, units, value, region)| EmissionFactor {
            category: category.to_string(),
            subtype: subtype.to_string(),
            units: units.to_string(),
            value,
            region: Some(region.to_string()),
            source: Some(DEFAULT_TABLE_SOURCE.to_string()),
            vintage: Some(DEFAULT_TABLE_VINTAGE.to_string()),
            id: Some(format!("{category}-{subtype}-{region}")),
        })
        .collect()
}

pub fn default_store() -> Result<FactorStore, ContractViolation> {
    FactorStore::new(default_factors())
}

/// Parses a flat JSON array of factor rows and validates every row.
pub fn load_from_json_str(raw: &str) -> Result<Vec<EmissionFactor>, FactorTableError> {
    let factors: Vec<EmissionFactor> = serde_json::from_str(raw)?;
    for f in &factors {
        f.validate()?;
    }
    Ok(factors)
}

pub fn load_from_path(path: &Path) -> Result<Vec<EmissionFactor>, FactorTableError> {
    let raw = fs::read_to_string(path).map_err(|source| FactorTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_json_str(&raw)
}

pub fn store_from_path(path: &Path) -> Result<FactorStore, FactorTableError> {
    let store = FactorStore::new(load_from_path(path)?)?;
    tracing::info!(
        path = %path.display(),
        factors = store.len(),
        fingerprint = store.fingerprint(),
        "factor table loaded"
    );
    Ok(store)
}
