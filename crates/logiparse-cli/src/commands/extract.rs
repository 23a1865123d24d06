//! Extract command - process a single document.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use logiparse_core::{ResultEnvelope, StrategyChoice};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or image); reads invoice text from stdin when omitted
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extraction strategy
    #[arg(short, long, value_enum, default_value = "auto")]
    strategy: Strategy,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON export
    Json,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Strategy {
    /// Pattern rules for text and PDF, model for images
    Auto,
    /// Deterministic pattern rules
    Pattern,
    /// Delegated model extraction
    Model,
}

impl From<Strategy> for StrategyChoice {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Auto => StrategyChoice::Auto,
            Strategy::Pattern => StrategyChoice::Pattern,
            Strategy::Model => StrategyChoice::Model,
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let choice = args.strategy.into();
    let pipeline = super::build_pipeline(&config, choice)?;

    let envelope = match &args.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            pipeline.process_file(path, choice)?
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            if text.trim().is_empty() {
                anyhow::bail!("No input: pass a file or pipe invoice text on stdin");
            }
            debug!("read {} characters from stdin", text.len());
            pipeline.process_text(&text, choice)?
        }
    };

    let output = match args.format {
        OutputFormat::Json => envelope.to_export_json()?,
        OutputFormat::Text => format_text(&envelope),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Not detected")
}

fn format_text(envelope: &ResultEnvelope) -> String {
    let data = &envelope.extracted_data;
    let report = &envelope.validation_report;
    let mut output = String::new();

    output.push_str(&format!("Invoice:  {}\n", field(&data.invoice_number)));
    output.push_str(&format!("Date:     {}\n", field(&data.date)));
    output.push_str(&format!("Sender:   {}\n", field(&data.sender)));
    output.push_str(&format!("Receiver: {}\n", field(&data.receiver)));
    output.push_str(&format!("Weight:   {}\n", field(&data.total_weight)));

    match (&data.total_amount, &data.currency) {
        (Some(amount), Some(currency)) => {
            output.push_str(&format!("Amount:   {} {}\n", currency, amount));
        }
        (Some(amount), None) => output.push_str(&format!("Amount:   {}\n", amount)),
        _ => output.push_str("Amount:   Not detected\n"),
    }

    output.push_str(&format!("Tracking: {}\n", field(&data.tracking_number)));

    if !data.items.is_empty() {
        output.push_str("\nItems:\n");
        for item in &data.items {
            output.push_str(&format!(
                "  {}  qty {}  @ {}  = {}\n",
                item.description, item.quantity, item.unit_price, item.line_total
            ));
        }
    }

    output.push_str(&format!(
        "\nValidation: {} ({})\n",
        report.status, report.field_coverage
    ));

    if !report.issues.is_empty() {
        output.push_str("Issues:\n");
        for issue in &report.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }
    if !report.warnings.is_empty() {
        output.push_str("Warnings:\n");
        for warning in &report.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
