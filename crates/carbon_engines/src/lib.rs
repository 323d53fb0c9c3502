#![forbid(unsafe_code)]

pub mod activity_map;
pub mod calc;
pub mod factor_store;
pub mod factor_table;
pub mod fallback;
pub mod modifiers;
pub mod units;

pub use calc::{CalcConfig, EmissionError, EmissionRuntime};
pub use factor_store::{FactorQuery, FactorStore};
pub use fallback::FallbackCalculator;
