use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use enhmelee_stats_lib::{
    outcome_to_json, read_settings, run_from_paths, write_outcome, PipelineSettings,
};

#[derive(Parser)]
#[command(name = "enhmelee-stats")]
#[command(about = "Attribute logged Melee games to reported tournament sets", long_about = None)]
struct Cli {
    /// Game log with `<timestamp>|<json>` lines
    log: PathBuf,

    /// Tab separated set results table
    results: PathBuf,

    /// Pipeline settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write reconciled sets as JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let settings = match cli.settings.as_deref() {
        Some(settings_path) => read_settings(settings_path)?,
        None => PipelineSettings::default(),
    };

    let outcome = run_from_paths(&cli.log, &cli.results, &settings)
        .context("Failed to reconcile game log with set results")?;

    tracing::info!(
        sets = outcome.sets.len(),
        incomplete_sets = outcome.incomplete_sets(),
        unclaimed_games = outcome.unclaimed_games,
        "Reconciled sets"
    );

    match cli.output {
        Some(output_path) => write_outcome(&output_path, &outcome)
            .with_context(|| format!("Failed to write {}", output_path.display()))?,
        None => println!("{}", outcome_to_json(&outcome)?),
    }

    Ok(())
}
