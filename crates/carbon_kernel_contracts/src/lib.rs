#![forbid(unsafe_code)]

pub mod activity;
pub mod calc;
pub mod common;
pub mod factor;
pub mod fallback;

pub use common::{ContractViolation, Validate};
