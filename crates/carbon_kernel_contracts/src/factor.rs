#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{validate_non_negative, validate_opt_text, validate_text};
use crate::{ContractViolation, Validate};

pub const FACTOR_UNITS_MARKER: &str = "_per_";

/// Reference factor row. `units` is `<numerator>_per_<denominator>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub category: String,
    pub subtype: String,
    pub units: String,
    pub value: f64,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub vintage: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl EmissionFactor {
    pub fn v1(
        category: &str,
        subtype: &str,
        units: &str,
        value: f64,
        region: Option<&str>,
    ) -> Result<Self, ContractViolation> {
        let f = Self {
            category: category.to_string(),
            subtype: subtype.to_string(),
            units: units.to_string(),
            value,
            region: region.map(str::to_string),
            source: None,
            vintage: None,
            id: None,
        };
        f.validate()?;
        Ok(f)
    }

    pub fn with_provenance(
        mut self,
        id: Option<&str>,
        source: Option<&str>,
        vintage: Option<&str>,
    ) -> Self {
        self.id = id.map(str::to_string);
        self.source = source.map(str::to_string);
        self.vintage = vintage.map(str::to_string);
        self
    }
}

impl Validate for EmissionFactor {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("emission_factor.category", &self.category, 64)?;
        validate_text("emission_factor.subtype", &self.subtype, 64)?;
        validate_text("emission_factor.units", &self.units, 64)?;
        if !self.units.contains(FACTOR_UNITS_MARKER) {
            return Err(ContractViolation::InvalidValue {
                field: "emission_factor.units",
                reason: "must contain _per_",
            });
        }
        validate_non_negative("emission_factor.value", self.value)?;
        validate_opt_text("emission_factor.region", self.region.as_deref(), 64)?;
        validate_opt_text("emission_factor.source", self.source.as_deref(), 256)?;
        validate_opt_text("emission_factor.vintage", self.vintage.as_deref(), 32)?;
        validate_opt_text("emission_factor.id", self.id.as_deref(), 128)?;
        Ok(())
    }
}
