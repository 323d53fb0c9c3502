#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use carbon_engines::calc::{decode_activity, RejectedActivity};
use carbon_engines::factor_table::{default_store, store_from_path};
use carbon_engines::{CalcConfig, EmissionRuntime, FactorStore};
use carbon_kernel_contracts::activity::ActivityRecord;
use carbon_kernel_contracts::fallback::{DietProfile, HomeProfile};
use carbon_os::estimate::{EstimateWiring, EstimateWiringConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const FACTOR_TABLE_ENV: &str = "CARBON_FACTOR_TABLE_PATH";
pub const USAGE: &str =
    "usage: carbon <calc|batch|fallback|diet|home|factors> [--factors <path>] [--no-fallback] [input.json]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub subcommand: String,
    pub factors_path: Option<PathBuf>,
    pub fallback_enabled: bool,
    pub input_path: Option<PathBuf>,
}

impl CliArgs {
    pub fn needs_input(&self) -> bool {
        self.subcommand != "factors"
    }
}

pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut iter = args.iter();
    let subcommand = iter.next().ok_or_else(|| USAGE.to_string())?.clone();
    let mut factors_path = None;
    let mut fallback_enabled = true;
    let mut input_path = None;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--factors" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--factors requires a path".to_string())?;
                factors_path = Some(PathBuf::from(path));
            }
            "--no-fallback" => fallback_enabled = false,
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            path if input_path.is_none() => input_path = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument: {extra}")),
        }
    }

    Ok(CliArgs {
        subcommand,
        factors_path,
        fallback_enabled,
        input_path,
    })
}

/// `--factors` wins over the environment; with neither, the built-in table.
pub fn load_store(
    factors_path: Option<&Path>,
    env_path: Option<&str>,
) -> Result<FactorStore, String> {
    let path = factors_path
        .map(Path::to_path_buf)
        .or_else(|| env_path.filter(|p| !p.trim().is_empty()).map(PathBuf::from));
    match path {
        Some(p) => store_from_path(&p).map_err(|e| e.to_string()),
        None => default_store().map_err(|e| format!("built-in factor table is invalid: {e}")),
    }
}

pub fn execute_command(
    store: Arc<FactorStore>,
    subcommand: &str,
    input: &str,
    fallback_enabled: bool,
) -> Result<String, String> {
    let runtime = EmissionRuntime::new(CalcConfig::mvp_v1(), store);
    match subcommand {
        "calc" => {
            let activity: ActivityRecord = parse_input(input)?;
            let result = runtime.calculate(&activity).map_err(|e| e.to_string())?;
            render(&result)
        }
        "batch" => {
            let raw: Vec<serde_json::Value> = parse_input(input)?;
            render(&runtime.calculate_batch_decoded(&decode_items(&raw)))
        }
        "fallback" => {
            let wiring =
                EstimateWiring::new(EstimateWiringConfig::mvp_v1(fallback_enabled), runtime);
            let value: serde_json::Value = parse_input(input)?;
            if let Some(raw) = value.as_array() {
                render(&wiring.run_batch_decoded(&decode_items(raw)))
            } else {
                let activity: ActivityRecord =
                    serde_json::from_value(value).map_err(|e| format!("invalid input: {e}"))?;
                let outcome = wiring.run(&activity).map_err(|e| e.to_string())?;
                render(&outcome)
            }
        }
        "diet" => {
            let profile: DietProfile = parse_input(input)?;
            let wiring =
                EstimateWiring::new(EstimateWiringConfig::mvp_v1(fallback_enabled), runtime);
            render(&wiring.annual_diet(&profile))
        }
        "home" => {
            let profile: HomeProfile = parse_input(input)?;
            let wiring =
                EstimateWiring::new(EstimateWiringConfig::mvp_v1(fallback_enabled), runtime);
            render(&wiring.annual_home_energy(&profile))
        }
        "factors" => {
            let store = runtime.store();
            render(&serde_json::json!({
                "count": store.len(),
                "fingerprint": store.fingerprint(),
                "factors": store.factors().collect::<Vec<_>>(),
            }))
        }
        _ => Err(format!(
            "unknown subcommand: {subcommand}. expected one of: calc, batch, fallback, diet, home, factors"
        )),
    }
}

fn decode_items(raw: &[serde_json::Value]) -> Vec<Result<ActivityRecord, RejectedActivity>> {
    raw.iter().map(decode_activity).collect()
}

fn parse_input<T: DeserializeOwned>(input: &str) -> Result<T, String> {
    if input.trim().is_empty() {
        return Err("input must not be empty".to_string());
    }
    serde_json::from_str(input).map_err(|e| format!("invalid input: {e}"))
}

fn render<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to render output: {e}"))
}
