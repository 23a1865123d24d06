//! Batch processing command for multiple document files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use logiparse_core::{ResultEnvelope, StrategyChoice};

use super::extract::Strategy;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Extraction strategy
    #[arg(short, long, value_enum, default_value = "auto")]
    strategy: Strategy,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    envelope: Option<ResultEnvelope>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let choice: StrategyChoice = args.strategy.into();
    let pipeline = super::build_pipeline(&config, choice)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "png" | "jpg" | "jpeg")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match pipeline.process_file(&path, choice) {
            Ok(envelope) => {
                if let Some(ref output_dir) = args.output_dir {
                    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("result");
                    let out_path = output_dir.join(format!("{}.json", name));
                    fs::write(&out_path, envelope.to_export_json()?)?;
                    debug!("wrote {}", out_path.display());
                }
                results.push(ProcessResult {
                    path,
                    envelope: Some(envelope),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        envelope: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    if let Some(ref summary_path) = args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let processed = results.iter().filter(|r| r.envelope.is_some()).count();
    let failed = results.len() - processed;
    let passed = results
        .iter()
        .filter_map(|r| r.envelope.as_ref())
        .filter(|e| e.validation_report.is_pass())
        .count();

    println!(
        "{} Processed {} files in {:.1}s: {} validation passes, {} failures, {} unreadable",
        style("ℹ").blue(),
        results.len(),
        start.elapsed().as_secs_f64(),
        passed,
        processed - passed,
        failed
    );

    Ok(())
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "invoice_number",
        "date",
        "total_amount",
        "currency",
        "status",
        "field_coverage",
        "error",
    ])?;

    for result in results {
        let file = result.path.display().to_string();
        match &result.envelope {
            Some(envelope) => {
                let data = &envelope.extracted_data;
                let report = &envelope.validation_report;
                let status = report.status.to_string();
                wtr.write_record([
                    file.as_str(),
                    data.invoice_number.as_deref().unwrap_or(""),
                    data.date.as_deref().unwrap_or(""),
                    data.total_amount.as_deref().unwrap_or(""),
                    data.currency.as_deref().unwrap_or(""),
                    status.as_str(),
                    report.field_coverage.as_str(),
                    "",
                ])?;
            }
            None => {
                wtr.write_record([
                    file.as_str(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    result.error.as_deref().unwrap_or("unknown error"),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
