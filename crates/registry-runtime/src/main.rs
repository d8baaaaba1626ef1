//! `stockroom-registry` entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use registry_runtime::{build_registry, execute, Backend, Cli, CommandError, DataLock, RuntimeConfig};
use stockroom_telemetry::{encode_metrics, init_telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("Registry command failed: {err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = RuntimeConfig::from_env()?.with_cli(&cli)?;
    init_telemetry(&config.telemetry).context("initializing telemetry")?;

    // Persistent backends hold committed state per process; serialize writers.
    let _lock = if cli.command.is_mutation() && config.backend != Backend::Memory {
        Some(DataLock::acquire(&config.store.data_file)?)
    } else {
        None
    };

    let registry = build_registry(config.backend, &config.store, config.registry.clone())
        .context("opening document store")?;
    info!(backend = ?config.backend, "Running registry command");

    let outcome = execute(&registry, cli.command, config.acting_user.as_deref()).await;

    if config.print_metrics {
        eprintln!("{}", encode_metrics()?);
    }

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ (CommandError::Registry(_) | CommandError::MissingUser)) => {
            println!("{}", serde_json::to_string_pretty(&err.to_json())?);
            Ok(ExitCode::from(err.exit_code()))
        }
        Err(err) => Err(err.into()),
    }
}
