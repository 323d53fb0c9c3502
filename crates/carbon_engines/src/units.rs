#![forbid(unsafe_code)]

use carbon_kernel_contracts::factor::FACTOR_UNITS_MARKER;
use thiserror::Error;

pub const KM_PER_MILE: f64 = 1.609344;
pub const LB_PER_KG: f64 = 2.20462262185;
pub const LITERS_PER_GALLON: f64 = 3.785411784;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unsupported unit conversion: {from} -> {to}")]
    UnsupportedConversion { from: String, to: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Miles,
    Kilometers,
    Kilograms,
    Pounds,
    Gallons,
    Liters,
    KilowattHours,
    Therms,
    Minutes,
    Items,
}

impl Unit {
    pub fn parse(raw: &str) -> Option<Self> {
        let unit = match raw.trim().to_ascii_lowercase().as_str() {
            "miles" | "mile" | "mi" => Unit::Miles,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Unit::Kilometers,
            "kg" | "kgs" | "kilogram" | "kilograms" => Unit::Kilograms,
            "lbs" | "lb" | "pound" | "pounds" => Unit::Pounds,
            "gallons" | "gallon" | "gal" => Unit::Gallons,
            "liters" | "liter" | "litres" | "litre" | "l" => Unit::Liters,
            "kwh" => Unit::KilowattHours,
            "therms" | "therm" => Unit::Therms,
            "minutes" | "minute" | "min" => Unit::Minutes,
            "items" | "item" => Unit::Items,
            _ => return None,
        };
        Some(unit)
    }
}

/// Converts `value` expressed in `from` into `to`. Only whitelisted pairs
/// convert; everything else is an error, never an assumed identity.
pub fn to_match_unit(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    if from == to {
        return Ok(value);
    }
    let unsupported = || UnitError::UnsupportedConversion {
        from: from.to_string(),
        to: to.to_string(),
    };
    let (Some(f), Some(t)) = (Unit::parse(from), Unit::parse(to)) else {
        return Err(unsupported());
    };
    let converted = match (f, t) {
        (a, b) if a == b => value,
        (Unit::Miles, Unit::Kilometers) => value * KM_PER_MILE,
        (Unit::Kilometers, Unit::Miles) => value / KM_PER_MILE,
        (Unit::Kilograms, Unit::Pounds) => value * LB_PER_KG,
        (Unit::Pounds, Unit::Kilograms) => value / LB_PER_KG,
        (Unit::Gallons, Unit::Liters) => value * LITERS_PER_GALLON,
        (Unit::Liters, Unit::Gallons) => value / LITERS_PER_GALLON,
        _ => return Err(unsupported()),
    };
    Ok(converted)
}

/// `"kgCO2_per_passenger_mile"` -> `Some("passenger_mile")`.
pub fn denominator_unit(factor_units: &str) -> Option<&str> {
    factor_units
        .find(FACTOR_UNITS_MARKER)
        .map(|idx| &factor_units[idx + FACTOR_UNITS_MARKER.len()..])
}

pub fn is_per_passenger(factor_units: &str) -> bool {
    match denominator_unit(factor_units) {
        Some(d) => d.contains("passenger") || d == "pkm",
        None => false,
    }
}

/// Caller-facing unit for an abstract factor denominator.
pub fn caller_unit_for_denominator(denominator: &str) -> &str {
    match denominator {
        "passenger_mile" | "vehicle_mile" => "miles",
        "pkm" => "km",
        "kWh" => "kWh",
        "kg" => "kg",
        "gallon" => "gallons",
        "minute" => "minutes",
        "item" => "items",
        "lb" => "lbs",
        "therms" => "therms",
        other => other,
    }
}
