#![forbid(unsafe_code)]

use carbon_kernel_contracts::activity::ActivityRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
    Cng,
    Lpg,
}

impl FuelType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "petrol" | "gasoline" => Some(FuelType::Petrol),
            "diesel" => Some(FuelType::Diesel),
            "hybrid" => Some(FuelType::Hybrid),
            "electric" | "ev" => Some(FuelType::Electric),
            "cng" => Some(FuelType::Cng),
            "lpg" => Some(FuelType::Lpg),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            FuelType::Petrol => 1.0,
            FuelType::Diesel => 1.15,
            FuelType::Hybrid => 0.6,
            FuelType::Electric => 0.3,
            FuelType::Cng => 0.8,
            FuelType::Lpg => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl FlightClass {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "economy" => Some(FlightClass::Economy),
            "premium_economy" => Some(FlightClass::PremiumEconomy),
            "business" => Some(FlightClass::Business),
            "first" => Some(FlightClass::First),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            FlightClass::Economy => 1.0,
            FlightClass::PremiumEconomy => 1.6,
            FlightClass::Business => 2.9,
            FlightClass::First => 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergySource {
    Grid,
    Coal,
    Mixed,
    Solar,
    Wind,
    Hydro,
    Renewable,
}

impl EnergySource {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "grid" => Some(EnergySource::Grid),
            "coal" => Some(EnergySource::Coal),
            "mixed" => Some(EnergySource::Mixed),
            "solar" => Some(EnergySource::Solar),
            "wind" => Some(EnergySource::Wind),
            "hydro" => Some(EnergySource::Hydro),
            "renewable" => Some(EnergySource::Renewable),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            EnergySource::Grid => 1.0,
            EnergySource::Coal => 1.3,
            EnergySource::Mixed => 0.6,
            EnergySource::Solar => 0.05,
            EnergySource::Wind => 0.03,
            EnergySource::Hydro => 0.04,
            EnergySource::Renewable => 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodType {
    Local,
    Organic,
    Seasonal,
    Imported,
    Processed,
    Frozen,
}

impl FoodType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "local" => Some(FoodType::Local),
            "organic" => Some(FoodType::Organic),
            "seasonal" => Some(FoodType::Seasonal),
            "imported" => Some(FoodType::Imported),
            "processed" => Some(FoodType::Processed),
            "frozen" => Some(FoodType::Frozen),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            FoodType::Local => 0.9,
            FoodType::Organic => 0.95,
            FoodType::Seasonal => 0.85,
            FoodType::Imported => 1.2,
            FoodType::Processed => 1.25,
            FoodType::Frozen => 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasteType {
    Mixed,
    Food,
    Plastic,
    Paper,
    Glass,
    Metal,
}

impl WasteType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "mixed" => Some(WasteType::Mixed),
            "food" | "organic" => Some(WasteType::Food),
            "plastic" => Some(WasteType::Plastic),
            "paper" => Some(WasteType::Paper),
            "glass" => Some(WasteType::Glass),
            "metal" => Some(WasteType::Metal),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            WasteType::Mixed => 1.0,
            WasteType::Food => 1.2,
            WasteType::Plastic => 1.1,
            WasteType::Paper => 0.8,
            WasteType::Glass => 0.6,
            WasteType::Metal => 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterTemp {
    Cold,
    Warm,
    Hot,
}

impl WaterTemp {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "cold" => Some(WaterTemp::Cold),
            "warm" => Some(WaterTemp::Warm),
            "hot" => Some(WaterTemp::Hot),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            WaterTemp::Cold => 1.0,
            WaterTemp::Warm => 1.5,
            WaterTemp::Hot => 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClothingType {
    Cotton,
    Polyester,
    Wool,
    Denim,
    Secondhand,
}

impl ClothingType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "cotton" => Some(ClothingType::Cotton),
            "polyester" | "synthetic" => Some(ClothingType::Polyester),
            "wool" => Some(ClothingType::Wool),
            "denim" => Some(ClothingType::Denim),
            "secondhand" | "second_hand" | "used" => Some(ClothingType::Secondhand),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ClothingType::Cotton => 1.0,
            ClothingType::Polyester => 1.3,
            ClothingType::Wool => 1.8,
            ClothingType::Denim => 1.5,
            ClothingType::Secondhand => 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectronicsType {
    Smartphone,
    Laptop,
    Tablet,
    Television,
    Refurbished,
}

impl ElectronicsType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "smartphone" | "phone" => Some(ElectronicsType::Smartphone),
            "laptop" => Some(ElectronicsType::Laptop),
            "tablet" => Some(ElectronicsType::Tablet),
            "television" | "tv" => Some(ElectronicsType::Television),
            "refurbished" => Some(ElectronicsType::Refurbished),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ElectronicsType::Smartphone => 1.0,
            ElectronicsType::Laptop => 3.5,
            ElectronicsType::Tablet => 1.6,
            ElectronicsType::Television => 4.0,
            ElectronicsType::Refurbished => 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnitureType {
    Wood,
    Metal,
    Upholstered,
    Secondhand,
}

impl FurnitureType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "wood" | "wooden" => Some(FurnitureType::Wood),
            "metal" => Some(FurnitureType::Metal),
            "upholstered" => Some(FurnitureType::Upholstered),
            "secondhand" | "second_hand" | "used" => Some(FurnitureType::Secondhand),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            FurnitureType::Wood => 1.0,
            FurnitureType::Metal => 1.4,
            FurnitureType::Upholstered => 1.8,
            FurnitureType::Secondhand => 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifierAdjustment {
    pub multiplier: f64,
    pub notes: Vec<String>,
}

impl ModifierAdjustment {
    fn identity() -> Self {
        Self {
            multiplier: 1.0,
            notes: Vec::new(),
        }
    }

    fn apply(&mut self, attribute: &str, raw: &str, multiplier: f64) {
        self.multiplier *= multiplier;
        self.notes
            .push(format!("{attribute} {} x{multiplier}", normalize(raw)));
    }

    pub fn note(&self) -> String {
        self.notes.join("; ")
    }
}

/// Folds every recognised attribute of `activity` into one multiplier.
/// Unrecognised or absent values leave the product untouched.
pub fn multiplier_from(activity: &ActivityRecord) -> ModifierAdjustment {
    let mut adj = ModifierAdjustment::identity();

    if let Some(raw) = activity.fuel_type.as_deref() {
        if let Some(v) = FuelType::parse(raw) {
            adj.apply("fuel type", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.flight_class.as_deref() {
        if let Some(v) = FlightClass::parse(raw) {
            adj.apply("flight class", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.energy_source.as_deref() {
        if let Some(v) = EnergySource::parse(raw) {
            adj.apply("energy source", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.food_type.as_deref() {
        if let Some(v) = FoodType::parse(raw) {
            adj.apply("food type", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.waste_type.as_deref() {
        if let Some(v) = WasteType::parse(raw) {
            adj.apply("waste type", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.water_temp.as_deref() {
        if let Some(v) = WaterTemp::parse(raw) {
            adj.apply("water temperature", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.clothing_type.as_deref() {
        if let Some(v) = ClothingType::parse(raw) {
            adj.apply("clothing type", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.electronics_type.as_deref() {
        if let Some(v) = ElectronicsType::parse(raw) {
            adj.apply("electronics type", raw, v.multiplier());
        }
    }
    if let Some(raw) = activity.furniture_type.as_deref() {
        if let Some(v) = FurnitureType::parse(raw) {
            adj.apply("furniture type", raw, v.multiplier());
        }
    }

    if !adj.notes.is_empty() {
        tracing::debug!(multiplier = adj.multiplier, notes = %adj.note(), "modifiers applied");
    }
    adj
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}
