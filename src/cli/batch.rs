//! Batch production from CSV (`cardforge batch`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::{BatchError, BatchPipeline};
use clap::Args;
use tracing::{info, warn};

use crate::cli::common::ProfileArgs;
use crate::cli::utils::{open_input, write_bytes};

/// Arguments for `cardforge batch`.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV with a `name` column and an optional `member_id` column (`-` for stdin).
    pub input: PathBuf,
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Destination ZIP archive.
    #[arg(short, long, default_value = "cards.zip")]
    pub output: PathBuf,
    /// Also write the run report as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn handle(args: BatchArgs) -> Result<()> {
    let base = args.profile.resolve()?;
    let input = open_input(&args.input)?;
    let pipeline = BatchPipeline::new(base);

    let output = match pipeline.run(input) {
        Ok(output) => output,
        Err(BatchError::NoRows) => {
            println!("No rows found.");
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("batch failed for {}", args.input.display()));
        }
    };

    write_bytes(&args.output, &output.archive)?;
    let report = &output.report;
    info!(cards = report.produced(), failures = report.failures.len(), "batch complete");

    println!(
        "Wrote {} cards ({} rows, {} skipped) to {}",
        report.produced(),
        report.rows_read,
        report.skipped,
        args.output.display()
    );
    for failure in &report.failures {
        warn!(row = failure.row, reason = %failure.reason, "row failed");
        println!("  row {}: {}", failure.row, failure.reason);
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_vec_pretty(report).context("failed to serialize report")?;
        write_bytes(path, &json)?;
        println!("Report -> {}", path.display());
    }
    Ok(())
}
