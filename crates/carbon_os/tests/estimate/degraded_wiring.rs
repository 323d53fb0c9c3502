#![forbid(unsafe_code)]

use std::sync::Arc;

use carbon_engines::factor_table::default_store;
use carbon_engines::{CalcConfig, EmissionError, EmissionRuntime};
use carbon_kernel_contracts::activity::ActivityRecord;
use carbon_kernel_contracts::fallback::{FallbackMethod, HomeProfile};
use carbon_os::estimate::{EstimateBatchEntry, EstimateOutcome, EstimateWiring, EstimateWiringConfig};

fn wiring(fallback_enabled: bool) -> EstimateWiring<EmissionRuntime> {
    let runtime = EmissionRuntime::new(CalcConfig::mvp_v1(), Arc::new(default_store().unwrap()));
    EstimateWiring::new(EstimateWiringConfig::mvp_v1(fallback_enabled), runtime)
}

fn activity(activity_type: &str, quantity: f64, units: &str) -> ActivityRecord {
    ActivityRecord::v1(activity_type, quantity, Some(units)).unwrap()
}

#[test]
fn at_estimate_wiring_01_known_activity_stays_primary() {
    let out = wiring(true).run(&activity("transport-car", 10.0, "miles")).unwrap();
    assert!(matches!(out, EstimateOutcome::Primary { .. }));
    assert_eq!(out.kg_co2e(), 2.1);
}

#[test]
fn at_estimate_wiring_02_unsupported_category_degrades() {
    let out = wiring(true)
        .run(&activity("digital-streaming", 4.0, "hours"))
        .unwrap();
    match out {
        EstimateOutcome::Degraded {
            estimate,
            primary_error,
        } => {
            assert_eq!(estimate.method, FallbackMethod::FlatFactor);
            assert_eq!(estimate.kg_co2e, 0.0);
            assert!(primary_error.contains("unsupported category"));
        }
        EstimateOutcome::Primary { .. } => panic!("expected degraded outcome"),
    }
}

#[test]
fn at_estimate_wiring_03_disabled_fallback_returns_error() {
    assert!(matches!(
        wiring(false).run(&activity("food-beef", 1.0, "miles")),
        Err(EmissionError::UnitMismatch { .. })
    ));
}

#[test]
fn at_estimate_wiring_04_batch_mixes_primary_and_degraded() {
    let batch = wiring(true).run_batch(&[
        activity("transport-car", 10.0, "miles"),
        activity("food-beef", 2.0, "miles"),
    ]);
    assert_eq!(batch.results.len(), 2);
    assert_eq!(batch.degraded_count, 1);
    // 2.1 primary + 2 * 12.0 flat (units not convertible, used as-is)
    assert_eq!(batch.total_kg_co2e, 26.1);
    assert!(batch
        .results
        .iter()
        .all(|e| matches!(e, EstimateBatchEntry::Estimated(_))));
}

#[test]
fn at_estimate_wiring_05_annual_profiles_pass_through() {
    let w = wiring(false);
    let home = w.annual_home_energy(&HomeProfile {
        square_footage: Some(1200.0),
        household_members: Some(2),
        ..HomeProfile::default()
    });
    assert_eq!(home.method, FallbackMethod::AnnualHomeEnergy);
    assert_eq!(home.kg_co2e, 1500.0);
}
