#![forbid(unsafe_code)]

use carbon_kernel_contracts::activity::ActivityRecord;
use carbon_kernel_contracts::fallback::{
    DietProfile, FallbackEstimate, FallbackMethod, HomeProfile,
};

use crate::calc::round_to;
use crate::units;

pub const HOME_KG_CO2E_PER_SQFT_YEAR: f64 = 2.5;
pub const UNKNOWN_DIET_BASELINE_KG: f64 = 800.0;

// (activity type, caller unit, kgCO2e per unit)
const FLAT_FACTORS: &[(&str, &str, f64)] = &[
    ("transport-car", "miles", 0.28),
    ("transport-bus", "miles", 0.1),
    ("transport-train", "miles", 0.06),
    ("transport-subway", "miles", 0.05),
    ("transport-motorcycle", "miles", 0.2),
    ("transport-rideshare", "miles", 0.3),
    ("transport-bicycle", "miles", 0.0),
    ("transport-walking", "miles", 0.0),
    ("transport-flight", "km", 0.15),
    ("energy-electricity", "kWh", 0.475),
    ("energy-natural-gas", "therms", 5.3),
    ("energy-heating-oil", "gallons", 10.16),
    ("energy-lpg", "gallons", 5.68),
    ("food-beef", "lbs", 12.0),
    ("food-lamb", "lbs", 10.0),
    ("food-pork", "lbs", 5.5),
    ("food-chicken", "lbs", 3.0),
    ("food-fish", "lbs", 2.7),
    ("food-cheese", "lbs", 6.0),
    ("food-dairy", "lbs", 1.4),
    ("food-eggs", "lbs", 2.2),
    ("food-rice", "lbs", 1.2),
    ("food-vegetables", "lbs", 0.9),
    ("food-fruit", "lbs", 0.5),
    ("food-grains", "lbs", 0.6),
    ("waste-landfill", "kg", 0.58),
    ("waste-recycling", "kg", 0.02),
    ("waste-compost", "kg", 0.01),
    ("water-shower", "minutes", 0.0085),
    ("water-dishwasher", "gallons", 0.0034),
    ("water-laundry", "gallons", 0.0034),
    ("water-tap", "gallons", 0.0034),
    ("shopping-clothing", "items", 15.0),
    ("shopping-electronics", "items", 70.0),
    ("shopping-furniture", "items", 90.0),
];

const PREFIX_DEFAULTS: &[(&str, f64)] = &[
    ("transport-", 0.25),
    ("energy-", 0.5),
    ("food-", 2.0),
    ("waste-", 0.5),
    ("water-", 0.01),
    ("shopping-", 10.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietType {
    Vegan,
    Vegetarian,
    Pescatarian,
    Flexitarian,
    Omnivore,
}

impl DietType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "vegan" => Some(DietType::Vegan),
            "vegetarian" => Some(DietType::Vegetarian),
            "pescatarian" => Some(DietType::Pescatarian),
            "flexitarian" => Some(DietType::Flexitarian),
            "omnivore" => Some(DietType::Omnivore),
            _ => None,
        }
    }

    pub fn base_annual_kg(self) -> f64 {
        match self {
            DietType::Vegan => 550.0,
            DietType::Vegetarian => 650.0,
            DietType::Pescatarian => 750.0,
            DietType::Flexitarian => 850.0,
            DietType::Omnivore => 1000.0,
        }
    }

    fn eats_red_meat(self) -> bool {
        matches!(self, DietType::Omnivore | DietType::Flexitarian)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedMeatFrequency {
    Never,
    Rarely,
    Sometimes,
    Often,
    Daily,
}

impl RedMeatFrequency {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "never" => Some(RedMeatFrequency::Never),
            "rarely" => Some(RedMeatFrequency::Rarely),
            "sometimes" => Some(RedMeatFrequency::Sometimes),
            "often" => Some(RedMeatFrequency::Often),
            "daily" => Some(RedMeatFrequency::Daily),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            RedMeatFrequency::Never => 0.7,
            RedMeatFrequency::Rarely => 0.85,
            RedMeatFrequency::Sometimes => 1.0,
            RedMeatFrequency::Often => 1.2,
            RedMeatFrequency::Daily => 1.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DairyConsumption {
    NoDairy,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl DairyConsumption {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "none" => Some(DairyConsumption::NoDairy),
            "low" => Some(DairyConsumption::Low),
            "moderate" => Some(DairyConsumption::Moderate),
            "high" => Some(DairyConsumption::High),
            "very_high" => Some(DairyConsumption::VeryHigh),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            DairyConsumption::NoDairy => 0.8,
            DairyConsumption::Low => 0.9,
            DairyConsumption::Moderate => 1.0,
            DairyConsumption::High => 1.2,
            DairyConsumption::VeryHigh => 1.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSize {
    Small,
    Medium,
    Large,
}

impl HomeSize {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "small" => Some(HomeSize::Small),
            "medium" => Some(HomeSize::Medium),
            "large" => Some(HomeSize::Large),
            _ => None,
        }
    }

    pub fn default_square_footage(self) -> f64 {
        match self {
            HomeSize::Small => 1000.0,
            HomeSize::Medium => 2000.0,
            HomeSize::Large => 3000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyUsage {
    VeryLow,
    Low,
    Average,
    High,
    VeryHigh,
}

impl EnergyUsage {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "very_low" => Some(EnergyUsage::VeryLow),
            "low" => Some(EnergyUsage::Low),
            "average" | "medium" => Some(EnergyUsage::Average),
            "high" => Some(EnergyUsage::High),
            "very_high" => Some(EnergyUsage::VeryHigh),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            EnergyUsage::VeryLow => 0.7,
            EnergyUsage::Low => 0.85,
            EnergyUsage::Average => 1.0,
            EnergyUsage::High => 1.3,
            EnergyUsage::VeryHigh => 1.6,
        }
    }
}

/// Self-contained degraded-mode estimator. Never fails: unknown inputs fall
/// back to documented defaults and every output is finite and >= 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCalculator;

impl FallbackCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(&self, activity: &ActivityRecord) -> FallbackEstimate {
        let mut notes = Vec::new();
        let quantity = match activity.quantity {
            Some(q) if q.is_finite() && q >= 0.0 => q,
            _ => {
                notes.push("quantity missing or invalid; using 0".to_string());
                0.0
            }
        };

        let (per_unit, table_units) = match flat_factor(&activity.activity_type) {
            Some((units, value)) => (value, Some(units)),
            None => {
                let value = prefix_default(&activity.activity_type);
                notes.push(format!("no fallback factor for type; using default {value}"));
                (value, None)
            }
        };

        let quantity = match (table_units, activity.units.as_deref()) {
            (Some(to), Some(from)) => match units::to_match_unit(quantity, from, to) {
                Ok(converted) => converted,
                Err(_) => {
                    notes.push(format!("units '{from}' not convertible to '{to}'; used as-is"));
                    quantity
                }
            },
            _ => quantity,
        };

        FallbackEstimate {
            activity_type: activity.activity_type.clone(),
            method: FallbackMethod::FlatFactor,
            kg_co2e: clamp_non_negative(quantity * per_unit),
            notes,
        }
    }

    pub fn annual_diet(&self, profile: &DietProfile) -> FallbackEstimate {
        let mut notes = Vec::new();
        let diet = profile.diet_type.as_deref().and_then(DietType::parse);
        let base = match diet {
            Some(d) => d.base_annual_kg(),
            None => {
                notes.push(format!("unknown diet type; baseline {UNKNOWN_DIET_BASELINE_KG}"));
                UNKNOWN_DIET_BASELINE_KG
            }
        };

        let red_meat = match diet {
            Some(d) if d.eats_red_meat() => profile
                .red_meat_frequency
                .as_deref()
                .and_then(RedMeatFrequency::parse)
                .map(RedMeatFrequency::multiplier)
                .unwrap_or(1.0),
            _ => 1.0,
        };
        let dairy = match diet {
            Some(DietType::Vegan) => 1.0,
            _ => profile
                .dairy_consumption
                .as_deref()
                .and_then(DairyConsumption::parse)
                .map(DairyConsumption::multiplier)
                .unwrap_or(1.0),
        };
        if red_meat != 1.0 {
            notes.push(format!("red meat x{red_meat}"));
        }
        if dairy != 1.0 {
            notes.push(format!("dairy x{dairy}"));
        }

        FallbackEstimate {
            activity_type: "annual-diet".to_string(),
            method: FallbackMethod::AnnualDiet,
            kg_co2e: clamp_non_negative(base * red_meat * dairy),
            notes,
        }
    }

    pub fn annual_home_energy(&self, profile: &HomeProfile) -> FallbackEstimate {
        let mut notes = Vec::new();
        let square_footage = match profile.square_footage {
            Some(sqft) if sqft.is_finite() && sqft > 0.0 => sqft,
            _ => {
                let size = profile
                    .home_size
                    .as_deref()
                    .and_then(HomeSize::parse)
                    .unwrap_or(HomeSize::Medium);
                let sqft = size.default_square_footage();
                notes.push(format!("square footage defaulted to {sqft}"));
                sqft
            }
        };
        let usage = profile
            .energy_usage
            .as_deref()
            .and_then(EnergyUsage::parse)
            .map(EnergyUsage::multiplier)
            .unwrap_or(1.0);
        let members = profile.household_members.filter(|m| *m >= 1).unwrap_or(1);

        FallbackEstimate {
            activity_type: "annual-home-energy".to_string(),
            method: FallbackMethod::AnnualHomeEnergy,
            kg_co2e: clamp_non_negative(
                square_footage * HOME_KG_CO2E_PER_SQFT_YEAR * usage / f64::from(members),
            ),
            notes,
        }
    }
}

fn flat_factor(activity_type: &str) -> Option<(&'static str, f64)> {
    FLAT_FACTORS
        .iter()
        .find(|(key, _, _)| *key == activity_type)
        .map(|&(_, units, value)| (units, value))
}

fn prefix_default(activity_type: &str) -> f64 {
    PREFIX_DEFAULTS
        .iter()
        .find(|(prefix, _)| activity_type.starts_with(prefix))
        .map(|&(_, value)| value)
        .unwrap_or(0.0)
}

fn clamp_non_negative(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        return 0.0;
    }
    round_to(value, 3)
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}
