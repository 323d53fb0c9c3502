#![forbid(unsafe_code)]

use carbon_engines::calc::{round_to, EmissionError, EmissionRuntime, RejectedActivity};
use carbon_engines::fallback::FallbackCalculator;
use carbon_kernel_contracts::activity::ActivityRecord;
use carbon_kernel_contracts::calc::{BatchFailure, CalculationResult};
use carbon_kernel_contracts::fallback::{DietProfile, FallbackEstimate, HomeProfile};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateWiringConfig {
    pub fallback_enabled: bool,
}

impl EstimateWiringConfig {
    pub fn mvp_v1(fallback_enabled: bool) -> Self {
        Self { fallback_enabled }
    }
}

pub trait EmissionEngine {
    fn calculate(&self, activity: &ActivityRecord) -> Result<CalculationResult, EmissionError>;
}

impl EmissionEngine for EmissionRuntime {
    fn calculate(&self, activity: &ActivityRecord) -> Result<CalculationResult, EmissionError> {
        EmissionRuntime::calculate(self, activity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EstimateOutcome {
    Primary {
        result: CalculationResult,
    },
    Degraded {
        estimate: FallbackEstimate,
        primary_error: String,
    },
}

impl EstimateOutcome {
    pub fn kg_co2e(&self) -> f64 {
        match self {
            EstimateOutcome::Primary { result } => result.calculated_kg_co2e,
            EstimateOutcome::Degraded { estimate, .. } => estimate.kg_co2e,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, EstimateOutcome::Degraded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EstimateBatchEntry {
    Estimated(EstimateOutcome),
    Failed(BatchFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateBatch {
    #[serde(rename = "total_kgCO2e")]
    pub total_kg_co2e: f64,
    pub degraded_count: usize,
    pub results: Vec<EstimateBatchEntry>,
}

/// Calls the primary engine first and only falls back on an error or an
/// unusable number. Whatever is returned is finite and non-negative.
#[derive(Debug, Clone)]
pub struct EstimateWiring<E>
where
    E: EmissionEngine,
{
    config: EstimateWiringConfig,
    engine: E,
    fallback: FallbackCalculator,
}

impl<E> EstimateWiring<E>
where
    E: EmissionEngine,
{
    pub fn new(config: EstimateWiringConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            fallback: FallbackCalculator::new(),
        }
    }

    pub fn run(&self, activity: &ActivityRecord) -> Result<EstimateOutcome, EmissionError> {
        let primary_error = match self.engine.calculate(activity) {
            Ok(result) if usable(result.calculated_kg_co2e) => {
                return Ok(EstimateOutcome::Primary { result });
            }
            Ok(result) => EmissionError::InvalidActivity(format!(
                "primary engine returned unusable value {}",
                result.calculated_kg_co2e
            )),
            Err(err) => err,
        };

        if !self.config.fallback_enabled {
            return Err(primary_error);
        }

        tracing::warn!(
            activity_type = %activity.activity_type,
            error = %primary_error,
            "primary calculation failed; using fallback estimate"
        );
        Ok(EstimateOutcome::Degraded {
            estimate: self.fallback.estimate(activity),
            primary_error: primary_error.to_string(),
        })
    }

    pub fn run_batch(&self, activities: &[ActivityRecord]) -> EstimateBatch {
        self.run_over(activities.iter().map(Ok))
    }

    /// Like `run_batch`, for raw submissions where some items did not decode.
    /// With fallback enabled those items degrade to a zero-quantity estimate.
    pub fn run_batch_decoded(
        &self,
        items: &[Result<ActivityRecord, RejectedActivity>],
    ) -> EstimateBatch {
        self.run_over(items.iter().map(Result::as_ref))
    }

    fn run_over<'a, I>(&self, items: I) -> EstimateBatch
    where
        I: Iterator<Item = Result<&'a ActivityRecord, &'a RejectedActivity>>,
    {
        let mut total = 0.0;
        let mut degraded_count = 0;
        let mut results = Vec::new();
        for item in items {
            let (activity_type, outcome) = match item {
                Ok(activity) => (activity.activity_type.as_str(), self.run(activity)),
                Err(rejected) => (rejected.activity_type.as_str(), self.run_rejected(rejected)),
            };
            match outcome {
                Ok(outcome) => {
                    total += outcome.kg_co2e();
                    if outcome.is_degraded() {
                        degraded_count += 1;
                    }
                    results.push(EstimateBatchEntry::Estimated(outcome));
                }
                Err(err) => results.push(EstimateBatchEntry::Failed(BatchFailure::new(
                    activity_type,
                    err.to_string(),
                ))),
            }
        }
        EstimateBatch {
            total_kg_co2e: round_to(total, 3),
            degraded_count,
            results,
        }
    }

    fn run_rejected(&self, rejected: &RejectedActivity) -> Result<EstimateOutcome, EmissionError> {
        if !self.config.fallback_enabled {
            return Err(rejected.error.clone());
        }
        tracing::warn!(
            activity_type = %rejected.activity_type,
            error = %rejected.error,
            "undecodable batch item; using fallback estimate"
        );
        let placeholder = ActivityRecord {
            activity_type: rejected.activity_type.clone(),
            ..ActivityRecord::default()
        };
        Ok(EstimateOutcome::Degraded {
            estimate: self.fallback.estimate(&placeholder),
            primary_error: rejected.error.to_string(),
        })
    }

    pub fn annual_diet(&self, profile: &DietProfile) -> FallbackEstimate {
        self.fallback.annual_diet(profile)
    }

    pub fn annual_home_energy(&self, profile: &HomeProfile) -> FallbackEstimate {
        self.fallback.annual_home_energy(profile)
    }
}

fn usable(kg_co2e: f64) -> bool {
    kg_co2e.is_finite() && kg_co2e >= 0.0
}
