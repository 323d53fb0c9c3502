#![forbid(unsafe_code)]

use std::sync::Arc;

use carbon_engines::factor_table::default_store;
use carbon_engines::fallback::FallbackCalculator;
use carbon_engines::{CalcConfig, EmissionError, EmissionRuntime};
use carbon_kernel_contracts::activity::ActivityRecord;
use carbon_kernel_contracts::calc::BatchEntry;
use carbon_kernel_contracts::fallback::DietProfile;
use carbon_kernel_contracts::Validate;

fn runtime() -> EmissionRuntime {
    EmissionRuntime::new(CalcConfig::mvp_v1(), Arc::new(default_store().unwrap()))
}

fn activity(activity_type: &str, quantity: f64, units: &str) -> ActivityRecord {
    ActivityRecord::v1(activity_type, quantity, Some(units)).unwrap()
}

#[test]
fn at_default_table_01_car_uses_city_factor() {
    let r = runtime().calculate(&activity("transport-car", 10.0, "miles")).unwrap();
    assert_eq!(r.calculated_kg_co2e, 2.1);
    assert_eq!(r.factor.region.as_deref(), Some("IN_Delhi"));
    assert!(r.validate().is_ok());
}

#[test]
fn at_default_table_02_calculation_is_idempotent() {
    let rt = runtime();
    let a = activity("food-beef", 1.0, "kg");
    let first = rt.calculate(&a).unwrap();
    let second = rt.calculate(&a).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.calculated_kg_co2e, 27.007);
}

#[test]
fn at_default_table_03_bicycle_and_walking_are_zero() {
    let rt = runtime();
    for t in ["transport-bicycle", "transport-walking"] {
        let r = rt.calculate(&activity(t, 12.0, "miles")).unwrap();
        assert_eq!(r.calculated_kg_co2e, 0.0, "{t}");
    }
}

#[test]
fn at_default_table_04_flight_haul_boundary() {
    let rt = runtime();
    let short = rt.calculate(&activity("transport-flight", 3699.0, "km")).unwrap();
    let long = rt.calculate(&activity("transport-flight", 3700.0, "km")).unwrap();
    assert_eq!(short.calculated_kg_co2e, 558.549);
    assert_eq!(long.calculated_kg_co2e, 547.6);
    assert!(long.notes[0].contains("long-haul"));
}

#[test]
fn at_default_table_05_energy_region_then_global() {
    let rt = runtime();
    let mut us = activity("energy-electricity", 100.0, "kWh");
    us.region = Some("US".to_string());
    assert_eq!(rt.calculate(&us).unwrap().calculated_kg_co2e, 38.6);

    let mut fr = activity("energy-electricity", 100.0, "kWh");
    fr.region = Some("FR".to_string());
    let r = rt.calculate(&fr).unwrap();
    assert_eq!(r.calculated_kg_co2e, 47.5);
    assert_eq!(r.factor.region.as_deref(), Some("Global"));
}

#[test]
fn at_default_table_06_water_appliances_share_treatment_factor() {
    let r = runtime()
        .calculate(&activity("water-dishwasher", 10.0, "gallons"))
        .unwrap();
    assert_eq!(r.calculated_kg_co2e, 0.034);
    assert_eq!(r.factor.id.as_deref(), Some("water-treatment-IN"));
}

#[test]
fn at_default_table_07_failures_are_typed() {
    let rt = runtime();
    assert!(matches!(
        rt.calculate(&activity("food-beef", 3.0, "miles")),
        Err(EmissionError::UnitMismatch { .. })
    ));
    assert!(matches!(
        rt.calculate(&activity("transport-teleport", 3.0, "miles")),
        Err(EmissionError::UnknownActivityType(_))
    ));
    assert!(matches!(
        rt.calculate(&activity("digital-streaming", 3.0, "hours")),
        Err(EmissionError::UnsupportedCategory(_))
    ));
}

#[test]
fn at_default_table_08_batch_total_matches_successes() {
    let batch = runtime().calculate_batch(&[
        activity("transport-car", 10.0, "miles"),
        activity("food-beef", 2.0, "lbs"),
        activity("transport-teleport", 1.0, "miles"),
    ]);
    assert_eq!(batch.results.len(), 3);
    assert_eq!(batch.success_count(), 2);
    assert_eq!(batch.failure_count(), 1);
    assert_eq!(batch.total_kg_co2e, 26.6);
    assert_eq!(batch.by_category.get("transportation"), Some(&2.1));
    assert_eq!(batch.by_category.get("food"), Some(&24.5));
    assert_eq!(batch.by_category.get("unknown"), Some(&0.0));
    assert!(matches!(batch.results[2], BatchEntry::Failed(_)));
}

#[test]
fn at_default_table_09_fallback_never_negative() {
    let fb = FallbackCalculator::new();
    for t in ["transport-car", "energy-unknown", "bogus", "water-tap"] {
        let a = ActivityRecord {
            activity_type: t.to_string(),
            quantity: Some(f64::NAN),
            ..ActivityRecord::default()
        };
        let est = fb.estimate(&a);
        assert!(est.kg_co2e.is_finite() && est.kg_co2e >= 0.0, "{t}");
    }
    let diet = fb.annual_diet(&DietProfile::default());
    assert!(diet.kg_co2e > 0.0);
}
