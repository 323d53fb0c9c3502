#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{validate_non_negative, validate_opt_text, validate_text};
use crate::{ContractViolation, Validate};

const MAX_ACTIVITY_TYPE_LEN: usize = 64;
const MAX_ATTRIBUTE_LEN: usize = 64;

/// One user-reported activity. Attribute fields are free-form strings as sent
/// by clients; the engine decides which values it recognises.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_temp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electronics_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furniture_type: Option<String>,
}

impl ActivityRecord {
    pub fn v1(
        activity_type: impl Into<String>,
        quantity: f64,
        units: Option<&str>,
    ) -> Result<Self, ContractViolation> {
        let a = Self {
            activity_type: activity_type.into(),
            quantity: Some(quantity),
            units: units.map(str::to_string),
            ..Self::default()
        };
        a.validate()?;
        Ok(a)
    }

    /// Quantity as the engine consumes it; only meaningful after `validate`.
    pub fn quantity_or_zero(&self) -> f64 {
        self.quantity.unwrap_or(0.0)
    }
}

impl Validate for ActivityRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text(
            "activity_record.activity_type",
            &self.activity_type,
            MAX_ACTIVITY_TYPE_LEN,
        )?;
        let Some(quantity) = self.quantity else {
            return Err(ContractViolation::InvalidValue {
                field: "activity_record.quantity",
                reason: "must be present",
            });
        };
        validate_non_negative("activity_record.quantity", quantity)?;
        validate_opt_text("activity_record.units", self.units.as_deref(), 32)?;
        validate_opt_text("activity_record.region", self.region.as_deref(), 64)?;
        for (field, value) in [
            ("activity_record.fuel_type", &self.fuel_type),
            ("activity_record.flight_class", &self.flight_class),
            ("activity_record.energy_source", &self.energy_source),
            ("activity_record.food_type", &self.food_type),
            ("activity_record.waste_type", &self.waste_type),
            ("activity_record.water_temp", &self.water_temp),
            ("activity_record.clothing_type", &self.clothing_type),
            ("activity_record.electronics_type", &self.electronics_type),
            ("activity_record.furniture_type", &self.furniture_type),
        ] {
            if let Some(v) = value {
                if v.len() > MAX_ATTRIBUTE_LEN {
                    return Err(ContractViolation::InvalidValue {
                        field,
                        reason: "exceeds max length",
                    });
                }
            }
        }
        Ok(())
    }
}
