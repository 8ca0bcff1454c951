//! Command line interface for the icon pack builder.
//!
//! This module parses arguments, merges them with the configuration file,
//! runs the pipeline and optionally writes the JSON run report.

mod args;

pub use args::Args;

use crate::config::load_config;
use crate::error::{CliError, Result};
use crate::pipeline::{Pipeline, RunReport};
use anyhow::Context;
use std::path::Path;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Runs the pipeline for already parsed arguments.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let (config_path, required) = args.config_path();
    let config = load_config(&config_path, required)?;
    let settings = args.settings_builder(config).build()?;

    let report = Pipeline::new(settings).run().await?;

    if let Some(path) = &args.report {
        write_report(path, &report)?;
        log::info!("Run report written to {}", path.display());
    }

    for skipped in report.render.skipped() {
        log::debug!("Skipped {}: {:?}", skipped.package, skipped.outcome);
    }
    log::info!(
        "Processing complete: {}/{} icons, module saved to {}",
        report.render.generated(),
        report.render.total(),
        report.module.path.display()
    );

    Ok(0)
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing run report {}", path.display()))?;
    Ok(())
}
