#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use carbon_kernel_contracts::activity::ActivityRecord;
use carbon_kernel_contracts::calc::{
    AppliedFactor, BatchEntry, BatchFailure, BatchResult, CalculationResult,
};
use carbon_kernel_contracts::factor::EmissionFactor;
use carbon_kernel_contracts::{ContractViolation, Validate};
use serde::Deserialize;
use thiserror::Error;

use crate::activity_map::{self, MappedActivity, FLIGHT_LONGHAUL_ECONOMY};
use crate::factor_store::{FactorQuery, FactorStore, PASSENGER_MILE_UNITS};
use crate::modifiers;
use crate::units::{self, UnitError};

pub const FLIGHT_UNITS: &str = "kgCO2e_per_pkm";
pub const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmissionError {
    #[error("invalid activity: {0}")]
    InvalidActivity(String),
    #[error("unknown activity type: {0}")]
    UnknownActivityType(String),
    #[error("no emission factor found for category '{category}' subtype '{subtype}'")]
    FactorNotFound { category: String, subtype: String },
    #[error("cannot convert quantity from '{from}' to '{to}'")]
    UnitMismatch { from: String, to: String },
    #[error("unsupported category: {0}")]
    UnsupportedCategory(String),
}

impl From<ContractViolation> for EmissionError {
    fn from(v: ContractViolation) -> Self {
        EmissionError::InvalidActivity(v.to_string())
    }
}

impl From<UnitError> for EmissionError {
    fn from(e: UnitError) -> Self {
        match e {
            UnitError::UnsupportedConversion { from, to } => EmissionError::UnitMismatch { from, to },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalcConfig {
    pub flight_longhaul_threshold_km: f64,
    pub rounding_decimals: i32,
}

impl CalcConfig {
    pub fn mvp_v1() -> Self {
        Self {
            flight_longhaul_threshold_km: 3700.0,
            rounding_decimals: 3,
        }
    }
}

/// A submitted batch element that could not be read as an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedActivity {
    pub activity_type: String,
    pub error: EmissionError,
}

/// Reads one raw batch element. Shape errors (wrong types, missing fields,
/// `null`) become `InvalidActivity`, keeping any `activityType` the element had.
pub fn decode_activity(raw: &serde_json::Value) -> Result<ActivityRecord, RejectedActivity> {
    ActivityRecord::deserialize(raw).map_err(|e| RejectedActivity {
        activity_type: raw
            .get("activityType")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
            .to_string(),
        error: EmissionError::InvalidActivity(e.to_string()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Transportation,
    Energy,
    Food,
    Waste,
    Water,
    Shopping,
}

impl Category {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "transportation" => Some(Category::Transportation),
            "energy" => Some(Category::Energy),
            "food" => Some(Category::Food),
            "waste" => Some(Category::Waste),
            "water" => Some(Category::Water),
            "shopping" => Some(Category::Shopping),
            _ => None,
        }
    }
}

/// Primary calculation engine over a shared, read-only factor store.
#[derive(Debug, Clone)]
pub struct EmissionRuntime {
    config: CalcConfig,
    store: Arc<FactorStore>,
}

impl EmissionRuntime {
    pub fn new(config: CalcConfig, store: Arc<FactorStore>) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> &FactorStore {
        &self.store
    }

    pub fn calculate(&self, activity: &ActivityRecord) -> Result<CalculationResult, EmissionError> {
        activity.validate()?;
        let mapped = activity_map::resolve(&activity.activity_type)?;
        let category = Category::parse(mapped.category)
            .ok_or_else(|| EmissionError::UnsupportedCategory(mapped.category.to_string()))?;

        let mut notes: Vec<String> = Vec::new();
        let factor = self.select_factor(activity, mapped, category, &mut notes)?;

        let denominator = units::denominator_unit(&factor.units).ok_or_else(|| {
            EmissionError::FactorNotFound {
                category: factor.category.clone(),
                subtype: factor.subtype.clone(),
            }
        })?;
        let target_units = units::caller_unit_for_denominator(denominator);
        let input_units = activity.units.as_deref().unwrap_or(target_units);
        let input_quantity = activity.quantity_or_zero();
        let mut standardized = units::to_match_unit(input_quantity, input_units, target_units)?;

        // Per-passenger factors already assume per-person distance.
        if !units::is_per_passenger(&factor.units) {
            if let Some(passengers) = activity.passengers.filter(|p| *p > 0) {
                standardized /= f64::from(passengers);
                notes.push(format!("divided by {passengers} passengers"));
            }
        }

        let adjustment = modifiers::multiplier_from(activity);
        notes.extend(adjustment.notes);

        let raw = standardized * factor.value * adjustment.multiplier;
        if !raw.is_finite() {
            return Err(EmissionError::InvalidActivity(
                "quantity produces a non-finite emission".to_string(),
            ));
        }

        Ok(CalculationResult {
            activity_type: activity.activity_type.clone(),
            input_quantity,
            input_units: input_units.to_string(),
            standardized_quantity: standardized,
            standardized_units: target_units.to_string(),
            factor: AppliedFactor::from(factor),
            calculated_kg_co2e: round_to(raw, self.config.rounding_decimals),
            notes,
        })
    }

    /// Runs every activity; one failure never discards the others.
    pub fn calculate_batch(&self, activities: &[ActivityRecord]) -> BatchResult {
        self.batch_over(activities.iter().map(Ok))
    }

    /// Batch over raw submissions, where items that did not decode still get
    /// a failure entry at their position.
    pub fn calculate_batch_decoded(
        &self,
        items: &[Result<ActivityRecord, RejectedActivity>],
    ) -> BatchResult {
        self.batch_over(items.iter().map(Result::as_ref))
    }

    fn batch_over<'a, I>(&self, items: I) -> BatchResult
    where
        I: Iterator<Item = Result<&'a ActivityRecord, &'a RejectedActivity>>,
    {
        let mut total = 0.0;
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut results = Vec::new();

        for item in items {
            let (activity_type, outcome) = match item {
                Ok(activity) => (activity.activity_type.as_str(), self.calculate(activity)),
                Err(rejected) => (rejected.activity_type.as_str(), Err(rejected.error.clone())),
            };
            let category = match item {
                Ok(activity) => activity_map::resolve(&activity.activity_type)
                    .map(|m| m.category)
                    .unwrap_or(UNKNOWN_CATEGORY),
                Err(_) => UNKNOWN_CATEGORY,
            };
            let subtotal = by_category.entry(category.to_string()).or_insert(0.0);
            match outcome {
                Ok(result) => {
                    total += result.calculated_kg_co2e;
                    *subtotal += result.calculated_kg_co2e;
                    results.push(BatchEntry::Calculated(result));
                }
                Err(err) => {
                    tracing::debug!(
                        activity_type = %activity_type,
                        error = %err,
                        "batch item failed"
                    );
                    results.push(BatchEntry::Failed(BatchFailure::new(
                        activity_type,
                        err.to_string(),
                    )));
                }
            }
        }

        let decimals = self.config.rounding_decimals;
        for v in by_category.values_mut() {
            *v = round_to(*v, decimals);
        }
        BatchResult {
            total_kg_co2e: round_to(total, decimals),
            by_category,
            results,
        }
    }

    fn select_factor(
        &self,
        activity: &ActivityRecord,
        mapped: MappedActivity,
        category: Category,
        notes: &mut Vec<String>,
    ) -> Result<&EmissionFactor, EmissionError> {
        let store = self.store.as_ref();
        let base = FactorQuery::new(mapped.category, mapped.subtype);
        let (subtype, found) = match category {
            Category::Transportation if mapped.is_flight() => {
                return self.select_flight_factor(activity, notes);
            }
            Category::Transportation => (
                mapped.subtype,
                store.resolve_preferring(
                    &base.units(PASSENGER_MILE_UNITS).region("IN_Delhi"),
                    &["IN"],
                ),
            ),
            Category::Energy => {
                let region = activity.region.as_deref().unwrap_or("Global");
                (
                    mapped.subtype,
                    store.resolve_preferring(&base.region(region), &["Global"]),
                )
            }
            Category::Food => (
                mapped.subtype,
                store.resolve(&base.units("kgCO2e_per_lb").region("Global")),
            ),
            Category::Waste => (
                mapped.subtype,
                store.resolve_preferring(
                    &base.units("kgCO2e_per_kg").region("Default"),
                    &["IN", "Global"],
                ),
            ),
            Category::Water => {
                let units = if mapped.subtype == "shower" {
                    "kgCO2e_per_minute"
                } else {
                    "kgCO2e_per_gallon"
                };
                (mapped.subtype, store.resolve(&base.units(units).region("IN")))
            }
            Category::Shopping => (
                mapped.subtype,
                store.resolve(&base.units("kgCO2e_per_item").region("Global")),
            ),
        };
        found.ok_or_else(|| EmissionError::FactorNotFound {
            category: mapped.category.to_string(),
            subtype: subtype.to_string(),
        })
    }

    fn select_flight_factor(
        &self,
        activity: &ActivityRecord,
        notes: &mut Vec<String>,
    ) -> Result<&EmissionFactor, EmissionError> {
        let store = self.store.as_ref();
        let input_units = activity.units.as_deref().unwrap_or("km");
        let distance_km = units::to_match_unit(activity.quantity_or_zero(), input_units, "km")?;

        let short = store.resolve(
            &FactorQuery::new("transportation", activity_map::FLIGHT_SHORTHAUL_ECONOMY)
                .units(FLIGHT_UNITS)
                .region("Global"),
        );
        let long = store.resolve(
            &FactorQuery::new("transportation", FLIGHT_LONGHAUL_ECONOMY)
                .units(FLIGHT_UNITS)
                .region("Global"),
        );

        let threshold = self.config.flight_longhaul_threshold_km;
        let subtype = activity_map::flight_subtype_for_km(distance_km, threshold);
        let chosen = if subtype == FLIGHT_LONGHAUL_ECONOMY {
            notes.push(format!("flight haul: long-haul (>= {threshold} km)"));
            long
        } else {
            notes.push(format!("flight haul: short-haul (< {threshold} km)"));
            short
        };
        chosen.ok_or_else(|| EmissionError::FactorNotFound {
            category: "transportation".to_string(),
            subtype: subtype.to_string(),
        })
    }
}

/// Round half up for the non-negative values this engine produces.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
