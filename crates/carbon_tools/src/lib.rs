#![forbid(unsafe_code)]

pub mod carbon_cli;
