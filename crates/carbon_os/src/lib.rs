#![forbid(unsafe_code)]

pub mod estimate;
