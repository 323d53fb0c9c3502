#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Self-reported diet inputs. Unknown strings are accepted; the fallback
/// calculator substitutes defaults for them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietProfile {
    #[serde(default)]
    pub diet_type: Option<String>,
    #[serde(default)]
    pub red_meat_frequency: Option<String>,
    #[serde(default)]
    pub dairy_consumption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeProfile {
    #[serde(default)]
    pub home_size: Option<String>,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub energy_usage: Option<String>,
    #[serde(default)]
    pub household_members: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackMethod {
    FlatFactor,
    AnnualDiet,
    AnnualHomeEnergy,
}

impl FallbackMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackMethod::FlatFactor => "FLAT_FACTOR",
            FallbackMethod::AnnualDiet => "ANNUAL_DIET",
            FallbackMethod::AnnualHomeEnergy => "ANNUAL_HOME_ENERGY",
        }
    }
}

/// Degraded-mode estimate. `kg_co2e` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackEstimate {
    #[serde(rename = "activityType")]
    pub activity_type: String,
    pub method: FallbackMethod,
    #[serde(rename = "calculated_kgCO2e")]
    pub kg_co2e: f64,
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_fallback_contract_01_profiles_tolerate_missing_fields() {
        let d: DietProfile = serde_json::from_str(r#"{"dietType":"vegan"}"#).unwrap();
        assert_eq!(d.diet_type.as_deref(), Some("vegan"));
        assert!(d.dairy_consumption.is_none());
        let h: HomeProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(h, HomeProfile::default());
    }

    #[test]
    fn at_fallback_contract_02_method_wire_name_matches_as_str() {
        let json = serde_json::to_value(FallbackMethod::AnnualHomeEnergy).unwrap();
        assert_eq!(json, FallbackMethod::AnnualHomeEnergy.as_str());
    }
}
