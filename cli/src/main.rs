//! `housing-sim` command-line runner
//!
//! ```text
//! housing-sim run <scenario.json> [--scope <token>] [--summary] [--pretty]
//! ```
//!
//! Writes outputs as JSON to stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use housing_simulator_core_rs::{Orchestrator, ScenarioOutputs, ScenarioParams};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

/// Housing policy simulator
///
/// Projects city housing markets year by year under a scenario's policy
/// levers and reports trajectories and regional roll-ups as JSON.
#[derive(Debug, Parser)]
#[command(name = "housing-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Commands {
    /// Run a scenario file and print its outputs
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Region to report (`national`, `state:<code>`, `city:<id>`)
        #[arg(long)]
        scope: Option<String>,

        /// Print region summaries instead of full trajectories
        #[arg(long)]
        summary: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn render(
    outputs: &ScenarioOutputs,
    scope: Option<&str>,
    summary: bool,
    pretty: bool,
) -> Result<String> {
    let value = match (scope, summary) {
        (Some(token), true) => serde_json::to_value(&outputs.region(token)?.summary)?,
        (Some(token), false) => serde_json::to_value(outputs.region(token)?)?,
        (None, true) => serde_json::to_value(
            outputs
                .regions
                .iter()
                .map(|(token, region)| (token.clone(), &region.summary))
                .collect::<BTreeMap<_, _>>(),
        )?,
        (None, false) => serde_json::to_value(outputs)?,
    };

    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

fn load_scenario(path: &Path) -> Result<ScenarioParams> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    let params = ScenarioParams::from_json(&json)
        .with_context(|| format!("Invalid scenario in {}", path.display()))?;
    info!(path = %path.display(), years = params.years, cities = params.cities.len(), "loaded scenario");
    Ok(params)
}

fn run(command: &Commands) -> Result<String> {
    match command {
        Commands::Run {
            scenario,
            scope,
            summary,
            pretty,
        } => {
            let params = load_scenario(scenario)?;
            let outputs = Orchestrator::new(params)?.run();
            for warning in &outputs.warnings {
                info!("warning: {}", warning);
            }
            render(&outputs, scope.as_deref(), *summary, *pretty)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
