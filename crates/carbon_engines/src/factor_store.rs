#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use carbon_kernel_contracts::factor::EmissionFactor;
use carbon_kernel_contracts::{ContractViolation, Validate};
use sha2::{Digest, Sha256};

use crate::units::denominator_unit;

pub const TRANSPORT_CATEGORY: &str = "transportation";
pub const PASSENGER_MILE_UNITS: &str = "kgCO2_per_passenger_mile";
pub const ZERO_EMISSION_MODES: &[&str] = &["bicycle", "walking"];

/// Lower-cased, trimmed region used on both sides of every comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorQuery<'a> {
    pub category: &'a str,
    pub subtype: &'a str,
    pub desired_units: Option<&'a str>,
    pub region: Option<&'a str>,
}

impl<'a> FactorQuery<'a> {
    pub fn new(category: &'a str, subtype: &'a str) -> Self {
        Self {
            category,
            subtype,
            desired_units: None,
            region: None,
        }
    }

    pub fn units(mut self, desired_units: &'a str) -> Self {
        self.desired_units = Some(desired_units);
        self
    }

    pub fn region(mut self, region: &'a str) -> Self {
        self.region = Some(region);
        self
    }
}

#[derive(Debug, Clone)]
struct IndexedFactor {
    factor: EmissionFactor,
    region_key: Option<RegionKey>,
    denominator: Option<String>,
}

/// Read-only factor index, built once. Lookups never mutate, so a shared
/// reference can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct FactorStore {
    rows: Vec<IndexedFactor>,
    by_key: BTreeMap<String, Vec<usize>>,
    by_category: BTreeMap<String, Vec<usize>>,
    fingerprint: String,
}

impl FactorStore {
    pub fn new(factors: Vec<EmissionFactor>) -> Result<Self, ContractViolation> {
        for f in &factors {
            f.validate()?;
        }
        let fingerprint = fingerprint_factors(&factors);

        let mut store = Self {
            rows: Vec::with_capacity(factors.len() + ZERO_EMISSION_MODES.len()),
            by_key: BTreeMap::new(),
            by_category: BTreeMap::new(),
            fingerprint,
        };
        for factor in factors {
            let idx = store.push_row(factor);
            let category = store.rows[idx].factor.category.clone();
            store.by_category.entry(category).or_default().push(idx);
        }
        for mode in ZERO_EMISSION_MODES {
            let key = factor_key(TRANSPORT_CATEGORY, mode, PASSENGER_MILE_UNITS);
            if store.by_key.contains_key(&key) {
                continue;
            }
            // Keyed lookup only; category scans must never pick these up.
            store.push_row(synthetic_zero_factor(mode));
        }
        Ok(store)
    }

    fn push_row(&mut self, factor: EmissionFactor) -> usize {
        let idx = self.rows.len();
        let key = factor_key(&factor.category, &factor.subtype, &factor.units);
        let region_key = factor.region.as_deref().map(RegionKey::new);
        let denominator = denominator_unit(&factor.units).map(str::to_string);
        self.rows.push(IndexedFactor {
            factor,
            region_key,
            denominator,
        });
        self.by_key.entry(key).or_default().push(idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// SHA-256 over the loaded rows in order, hex encoded. Fields are joined
    /// with 0x1f and rows terminated with 0x1e; `value` is hashed by its bits.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn factors(&self) -> impl Iterator<Item = &EmissionFactor> {
        self.rows.iter().map(|r| &r.factor)
    }

    pub fn resolve(&self, query: &FactorQuery<'_>) -> Option<&EmissionFactor> {
        self.resolve_preferring(query, &[])
    }

    /// Like `resolve`, but the exact-region step is also tried for each of
    /// `also_regions` (in order) before degrading to the any-region steps.
    pub fn resolve_preferring(
        &self,
        query: &FactorQuery<'_>,
        also_regions: &[&str],
    ) -> Option<&EmissionFactor> {
        let requested = query.region.map(RegionKey::new);
        let mut step1_regions: Vec<RegionKey> = requested.iter().cloned().collect();
        step1_regions.extend(also_regions.iter().map(|r| RegionKey::new(r)));

        let exact: Vec<usize> = match query.desired_units {
            Some(units) => self
                .by_key
                .get(&factor_key(query.category, query.subtype, units))
                .cloned()
                .unwrap_or_default(),
            None => self
                .category_rows(query.category)
                .iter()
                .copied()
                .filter(|&i| self.rows[i].factor.subtype == query.subtype)
                .collect(),
        };

        // 1. exact key, region match (any entry when no region asked for)
        if step1_regions.is_empty() {
            if let Some(&i) = exact.first() {
                return Some(self.hit(1, i));
            }
        } else {
            for region in &step1_regions {
                if let Some(i) = self.first_in_region(&exact, region) {
                    return Some(self.hit(1, i));
                }
            }
        }

        // 2. exact key, any region
        if let Some(&i) = exact.first() {
            return Some(self.hit(2, i));
        }

        let category_rows = self.category_rows(query.category);

        // 3. compatible denominator anywhere in the category
        if let Some(denominator) = query.desired_units.and_then(denominator_unit) {
            let compatible: Vec<usize> = category_rows
                .iter()
                .copied()
                .filter(|&i| self.rows[i].denominator.as_deref() == Some(denominator))
                .collect();
            let preferred = requested
                .as_ref()
                .and_then(|region| self.first_in_region(&compatible, region));
            if let Some(i) = preferred.or_else(|| compatible.first().copied()) {
                return Some(self.hit(3, i));
            }
        }

        // 4. anything in the category
        if let Some(&i) = category_rows.first() {
            return Some(self.hit(4, i));
        }

        tracing::debug!(
            category = query.category,
            subtype = query.subtype,
            "factor resolution exhausted"
        );
        None
    }

    fn category_rows(&self, category: &str) -> &[usize] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn first_in_region(&self, candidates: &[usize], region: &RegionKey) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .find(|&i| self.rows[i].region_key.as_ref() == Some(region))
    }

    fn hit(&self, step: u8, idx: usize) -> &EmissionFactor {
        let factor = &self.rows[idx].factor;
        tracing::debug!(
            step,
            factor_id = factor.id.as_deref().unwrap_or("-"),
            category = %factor.category,
            subtype = %factor.subtype,
            "factor resolved"
        );
        factor
    }
}

pub fn factor_key(category: &str, subtype: &str, units: &str) -> String {
    format!("{category}::{subtype}::{units}")
}

fn synthetic_zero_factor(mode: &str) -> EmissionFactor {
    EmissionFactor {
        category: TRANSPORT_CATEGORY.to_string(),
        subtype: mode.to_string(),
        units: PASSENGER_MILE_UNITS.to_string(),
        value: 0.0,
        region: None,
        source: Some("zero-emission mode".to_string()),
        vintage: None,
        id: Some(format!("synthetic-zero-{mode}")),
    }
}

const FIELD_SEP: &[u8] = b"\x1f";
const ROW_SEP: &[u8] = b"\x1e";

fn fingerprint_factors(factors: &[EmissionFactor]) -> String {
    let mut hasher = Sha256::new();
    for f in factors {
        hasher.update(f.category.as_bytes());
        hasher.update(FIELD_SEP);
        hasher.update(f.subtype.as_bytes());
        hasher.update(FIELD_SEP);
        hasher.update(f.units.as_bytes());
        hasher.update(FIELD_SEP);
        hasher.update(f.value.to_bits().to_be_bytes());
        for opt in [&f.region, &f.source, &f.vintage, &f.id] {
            hasher.update(FIELD_SEP);
            hasher.update(opt.as_deref().unwrap_or("").as_bytes());
        }
        hasher.update(ROW_SEP);
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(category: &str, subtype: &str, units: &str, value: f64, region: Option<&str>) -> EmissionFactor {
        let id = format!("{category}-{subtype}-{}", region.unwrap_or("none"));
        EmissionFactor::v1(category, subtype, units, value, region)
            .unwrap()
            .with_provenance(Some(&id), None, None)
    }

    fn store() -> FactorStore {
        FactorStore::new(vec![
            f("transportation", "car", PASSENGER_MILE_UNITS, 0.30, Some("US")),
            f("transportation", "car", PASSENGER_MILE_UNITS, 0.25, Some("IN")),
            f("transportation", "bus", PASSENGER_MILE_UNITS, 0.10, Some("IN_Delhi")),
            f("transportation", "train", "kgCO2_per_vehicle_mile", 8.0, Some("IN")),
            f("energy", "electricity", "kgCO2e_per_kWh", 0.82, Some("IN")),
            f("energy", "electricity", "kgCO2e_per_kWh", 0.475, Some("Global")),
            f("energy", "natural_gas", "kgCO2e_per_therms", 5.3, Some("Global")),
        ])
        .unwrap()
    }

    #[test]
    fn at_store_01_region_exact_match_returns_that_factor() {
        let s = store();
        for factor in s.factors().filter(|f| f.region.is_some()).cloned().collect::<Vec<_>>() {
            let q = FactorQuery::new(&factor.category, &factor.subtype)
                .units(&factor.units)
                .region(factor.region.as_deref().unwrap());
            assert_eq!(s.resolve(&q), Some(&factor));
        }
    }

    #[test]
    fn at_store_02_region_match_is_case_insensitive() {
        let s = store();
        let q = FactorQuery::new("transportation", "car")
            .units(PASSENGER_MILE_UNITS)
            .region("  in ");
        assert_eq!(s.resolve(&q).unwrap().value, 0.25);
    }

    #[test]
    fn at_store_03_same_key_any_region_when_region_misses() {
        let s = store();
        let q = FactorQuery::new("transportation", "car")
            .units(PASSENGER_MILE_UNITS)
            .region("FR");
        assert_eq!(s.resolve(&q).unwrap().region.as_deref(), Some("US"));
    }

    #[test]
    fn at_store_04_compatible_denominator_in_category_prefers_region() {
        let s = store();
        let q = FactorQuery::new("transportation", "rideshare")
            .units(PASSENGER_MILE_UNITS)
            .region("IN_Delhi");
        assert_eq!(s.resolve(&q).unwrap().subtype, "bus");

        let q = FactorQuery::new("transportation", "rideshare").units(PASSENGER_MILE_UNITS);
        assert_eq!(s.resolve(&q).unwrap().region.as_deref(), Some("US"));
    }

    #[test]
    fn at_store_05_anything_in_category_as_last_resort() {
        let s = store();
        let q = FactorQuery::new("energy", "solar_thermal").units("kgCO2e_per_gallon");
        assert_eq!(s.resolve(&q).unwrap().subtype, "electricity");
    }

    #[test]
    fn at_store_06_absent_category_yields_none() {
        let s = store();
        let q = FactorQuery::new("food", "beef").units("kgCO2e_per_lb");
        assert!(s.resolve(&q).is_none());
    }

    #[test]
    fn at_store_07_zero_emission_modes_get_synthetic_factor() {
        let s = store();
        let q = FactorQuery::new("transportation", "bicycle").units(PASSENGER_MILE_UNITS);
        let factor = s.resolve(&q).unwrap();
        assert_eq!(factor.value, 0.0);
        assert_eq!(factor.id.as_deref(), Some("synthetic-zero-bicycle"));

        // never offered to other subtypes by category scans
        let q = FactorQuery::new("transportation", "scooter").units(PASSENGER_MILE_UNITS);
        assert_ne!(s.resolve(&q).unwrap().value, 0.0);
    }

    #[test]
    fn at_store_08_table_entry_for_zero_mode_is_kept() {
        let s = FactorStore::new(vec![f(
            "transportation",
            "walking",
            PASSENGER_MILE_UNITS,
            0.0,
            Some("Global"),
        )])
        .unwrap();
        let q = FactorQuery::new("transportation", "walking").units(PASSENGER_MILE_UNITS);
        assert_eq!(
            s.resolve(&q).unwrap().id.as_deref(),
            Some("transportation-walking-Global")
        );
    }

    #[test]
    fn at_store_09_native_units_resolution_filters_by_subtype() {
        let s = store();
        let q = FactorQuery::new("energy", "electricity").region("Global");
        assert_eq!(s.resolve(&q).unwrap().value, 0.475);
        let q = FactorQuery::new("energy", "natural_gas").region("IN");
        assert_eq!(s.resolve(&q).unwrap().units, "kgCO2e_per_therms");
    }

    #[test]
    fn at_store_10_preference_list_tried_in_order() {
        let s = store();
        let q = FactorQuery::new("energy", "electricity").region("DE");
        assert_eq!(s.resolve_preferring(&q, &["IN", "Global"]).unwrap().value, 0.82);
        assert_eq!(s.resolve_preferring(&q, &["Global"]).unwrap().value, 0.475);
    }

    #[test]
    fn at_store_11_fingerprint_is_stable_and_content_sensitive() {
        let a = store();
        let b = store();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        let c = FactorStore::new(vec![f("food", "beef", "kgCO2e_per_lb", 27.0, None)]).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn at_store_13_fingerprint_keeps_field_boundaries() {
        let a = FactorStore::new(vec![f("ab", "c", "kgCO2e_per_kg", 1.0, None)]).unwrap();
        let b = FactorStore::new(vec![f("a", "bc", "kgCO2e_per_kg", 1.0, None)]).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert!(a.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn at_store_12_invalid_factor_rejected() {
        let mut bad = f("food", "beef", "kgCO2e_per_lb", 27.0, None);
        bad.units = "kgCO2e".to_string();
        assert!(FactorStore::new(vec![bad]).is_err());
    }
}
