#![forbid(unsafe_code)]

use crate::calc::EmissionError;

pub const FLIGHT_SUBTYPE: &str = "flight";
pub const FLIGHT_SHORTHAUL_ECONOMY: &str = "flight_shorthaul_economy";
pub const FLIGHT_LONGHAUL_ECONOMY: &str = "flight_longhaul_economy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappedActivity {
    pub category: &'static str,
    pub subtype: &'static str,
}

impl MappedActivity {
    /// Flights leave the final subtype to the engine, which picks a haul
    /// length from the distance.
    pub fn is_flight(&self) -> bool {
        self.subtype == FLIGHT_SUBTYPE
    }
}

const ACTIVITY_TABLE: &[(&str, &str, &str)] = &[
    ("transport-car", "transportation", "car"),
    ("transport-bus", "transportation", "bus"),
    ("transport-train", "transportation", "train"),
    ("transport-subway", "transportation", "subway"),
    ("transport-motorcycle", "transportation", "motorcycle"),
    ("transport-rideshare", "transportation", "rideshare"),
    ("transport-bicycle", "transportation", "bicycle"),
    ("transport-walking", "transportation", "walking"),
    ("transport-flight", "transportation", FLIGHT_SUBTYPE),
    ("energy-electricity", "energy", "electricity"),
    ("energy-natural-gas", "energy", "natural_gas"),
    ("energy-heating-oil", "energy", "heating_oil"),
    ("energy-lpg", "energy", "lpg"),
    ("food-beef", "food", "beef"),
    ("food-lamb", "food", "lamb"),
    ("food-pork", "food", "pork"),
    ("food-chicken", "food", "chicken"),
    ("food-fish", "food", "fish"),
    ("food-cheese", "food", "cheese"),
    ("food-dairy", "food", "dairy"),
    ("food-eggs", "food", "eggs"),
    ("food-rice", "food", "rice"),
    ("food-vegetables", "food", "vegetables"),
    ("food-fruit", "food", "fruit"),
    ("food-grains", "food", "grains"),
    ("waste-landfill", "waste", "landfill"),
    ("waste-recycling", "waste", "recycling"),
    ("waste-compost", "waste", "compost"),
    ("water-shower", "water", "shower"),
    ("water-dishwasher", "water", "dishwasher"),
    ("water-laundry", "water", "laundry"),
    ("water-tap", "water", "tap"),
    ("shopping-clothing", "shopping", "clothing"),
    ("shopping-electronics", "shopping", "electronics"),
    ("shopping-furniture", "shopping", "furniture"),
    ("digital-streaming", "digital", "video_streaming"),
];

pub fn resolve(activity_type: &str) -> Result<MappedActivity, EmissionError> {
    ACTIVITY_TABLE
        .iter()
        .find(|(key, _, _)| *key == activity_type)
        .map(|&(_, category, subtype)| MappedActivity { category, subtype })
        .ok_or_else(|| EmissionError::UnknownActivityType(activity_type.to_string()))
}

pub fn known_activity_types() -> impl Iterator<Item = &'static str> {
    ACTIVITY_TABLE.iter().map(|(key, _, _)| *key)
}

/// Haul subtype for a flight distance already expressed in kilometers.
pub fn flight_subtype_for_km(distance_km: f64, longhaul_threshold_km: f64) -> &'static str {
    if distance_km >= longhaul_threshold_km {
        FLIGHT_LONGHAUL_ECONOMY
    } else {
        FLIGHT_SHORTHAUL_ECONOMY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_map_01_known_types_resolve() {
        assert_eq!(
            resolve("transport-car").unwrap(),
            MappedActivity {
                category: "transportation",
                subtype: "car"
            }
        );
        assert_eq!(resolve("energy-natural-gas").unwrap().subtype, "natural_gas");
        assert!(resolve("transport-flight").unwrap().is_flight());
    }

    #[test]
    fn at_map_02_unknown_type_fails() {
        assert!(matches!(
            resolve("bogus"),
            Err(EmissionError::UnknownActivityType(t)) if t == "bogus"
        ));
    }

    #[test]
    fn at_map_03_haul_threshold_is_inclusive_on_long_side() {
        assert_eq!(flight_subtype_for_km(3699.0, 3700.0), FLIGHT_SHORTHAUL_ECONOMY);
        assert_eq!(flight_subtype_for_km(3700.0, 3700.0), FLIGHT_LONGHAUL_ECONOMY);
    }

    #[test]
    fn at_map_04_activity_keys_are_unique() {
        let keys: Vec<&str> = known_activity_types().collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
    }
}
