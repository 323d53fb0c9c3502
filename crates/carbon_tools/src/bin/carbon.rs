#![forbid(unsafe_code)]

use std::env;
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use carbon_tools::carbon_cli::{execute_command, load_store, parse_args, FACTOR_TABLE_ENV};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CARBON_LOG";

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let env_path = env::var(FACTOR_TABLE_ENV).ok();
    let store = load_store(cli.factors_path.as_deref(), env_path.as_deref())?;

    let input = if cli.needs_input() {
        match &cli.input_path {
            Some(path) => fs::read_to_string(path)
                .map_err(|e| format!("failed to read '{}': {e}", path.display()))?,
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| e.to_string())?;
                buf
            }
        }
    } else {
        String::new()
    };

    let output = execute_command(
        Arc::new(store),
        &cli.subcommand,
        &input,
        cli.fallback_enabled,
    )?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
