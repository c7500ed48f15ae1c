use std::{path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use kestrel_core::{BotSettings, Vector3};
use tracing_subscriber::fmt;

mod plan;
mod sim;

#[derive(Debug, Parser)]
#[command(name = "kestrel-cli")]
pub(crate) struct Args {
    #[clap(long, default_value = "kestrel-settings.json")]
    settings_file: PathBuf,

    #[clap(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Solve for an intercept from a standing start and print it as JSON.
    Plan(plan::PlanArgs),
    /// Drive a bot against the built-in toy simulation.
    Run(sim::RunArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = tracing::Level::from_str(&args.log_level)
        .map_err(|_| anyhow!("Invalid log level: {}", args.log_level))?;
    // `try_init` also forwards `log` records from the library crates.
    fmt::Subscriber::builder()
        .with_max_level(log_level)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!("Unable to set global tracing subscriber: {}", err))?;

    let settings = BotSettings::load_or_insert(&args.settings_file)
        .with_context(|| format!("Failed to load settings from {}", args.settings_file.display()))?;
    tracing::debug!("Loaded settings from {}", args.settings_file.display());

    match args.command {
        Command::Plan(plan_args) => plan::run(&settings, &plan_args),
        Command::Run(run_args) => sim::run(settings, &run_args),
    }
}

/// Parses `x,y,z` into a vector.
pub(crate) fn parse_vector(s: &str) -> Result<Vector3> {
    let parts = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid coordinate '{}'", part))
        })
        .collect::<Result<Vec<_>>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => bail!("Expected three comma separated coordinates, got '{}'", s),
    }
}
