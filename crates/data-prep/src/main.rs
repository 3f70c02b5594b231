//! CLI entry point for the data cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use data_prep::{
    CleaningReport, ColumnKind, Pipeline, PipelineConfig, PipelineConfigBuilder, ReportGenerator,
    read_raw_data,
};
use dotenv::dotenv;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Batch cleaning pipeline for tabular customer data",
    long_about = "Reads <data-dir>/raw/<input>, trims column names, removes duplicate rows, \
                  fills missing values (mean for numeric, mode for categorical), drops z-score \
                  outliers and writes <data-dir>/prepared/<output>.\n\n\
                  EXAMPLES:\n  \
                  # Default locations\n  \
                  data-prep\n\n  \
                  # Custom file names and a stricter outlier threshold\n  \
                  data-prep --input orders.csv --output orders_clean.csv --z-threshold 2.5\n\n  \
                  # Preview without writing anything\n  \
                  data-prep --dry-run"
)]
struct Args {
    /// Root directory holding raw/ and prepared/
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Input file name under <data-dir>/raw
    #[arg(short, long)]
    input: Option<String>,

    /// Output file name under <data-dir>/prepared
    #[arg(short, long)]
    output: Option<String>,

    /// Rows with |z| at or above this value in any numeric column are removed
    #[arg(short, long)]
    z_threshold: Option<f64>,

    /// Field separator used for both reading and writing
    #[arg(short, long)]
    separator: Option<char>,

    /// JSON file with pipeline settings
    ///
    /// Flags given on the command line override values from the file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON report to stdout instead of a human-readable summary
    ///
    /// Disables all logs.
    #[arg(long)]
    json: bool,

    /// Write a JSON report next to the cleaned file
    ///
    /// The report will be saved as <output_stem>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Load and profile the input without cleaning or writing anything
    #[arg(long)]
    dry_run: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// only carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load before the filter is built so RUST_LOG can come from .env
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    info!("{}", "=".repeat(34));
    info!("STARTING data-prep");
    info!("{}", "=".repeat(34));
    info!("Root         : {}", config.data_dir.display());
    info!("data/raw     : {}", config.raw_dir().display());
    info!("data/prepared: {}", config.prepared_dir().display());

    if args.dry_run {
        return run_dry_run(&args, &config);
    }

    let pipeline = Pipeline::builder().config(config).build()?;

    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed: {}", e));
        }
    };

    let config = pipeline.config();
    info!("{}", "=".repeat(34));
    info!("Original shape: {}", result.summary.original_shape);
    info!("Cleaned shape : {}", result.summary.cleaned_shape);
    info!("FINISHED data-prep");
    info!("{}", "=".repeat(34));

    let report = ReportGenerator::build_report(
        &config.input_path(),
        Some(&config.output_path()),
        &result.summary,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(config.prepared_dir());
        let report_path = generator.write_report(&report, &output_stem(config))?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Merge the optional JSON config file with command-line overrides.
fn build_config(args: &Args) -> Result<PipelineConfig> {
    let base = match args.config {
        Some(ref path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    let mut builder = PipelineConfigBuilder::from_config(base);

    if let Some(ref dir) = args.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(ref input) = args.input {
        builder = builder.input_file(input);
    }
    if let Some(ref output) = args.output {
        builder = builder.output_file(output);
    }
    if let Some(threshold) = args.z_threshold {
        builder = builder.z_threshold(threshold);
    }
    if let Some(separator) = args.separator {
        let byte = u8::try_from(separator)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow!("Separator must be a single ASCII character, got {:?}", separator))?;
        builder = builder.separator(byte);
    }

    Ok(builder.build()?)
}

fn output_stem(config: &PipelineConfig) -> String {
    Path::new(&config.output_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Preview what the pipeline would do without cleaning or writing.
///
/// Uses `println!` for the preview itself since that output is the whole
/// point of `--dry-run` and should not depend on the log level.
fn run_dry_run(args: &Args, config: &PipelineConfig) -> Result<()> {
    let input_path = config.input_path();
    let data = read_raw_data(&input_path, config.separator)?;

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning actions");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", input_path.display());
    println!("  Rows: {}", data.height());
    println!("  Columns: {}", data.width());
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<24} {:<12} {:<12} {:<10} {:<10}",
        "Column", "Kind", "Type", "Missing", "Unique"
    );
    println!("{}", "-".repeat(70));

    let mut renamed = Vec::new();
    let mut missing_total = 0usize;
    for column in data.get_columns() {
        let name = column.name().to_string();
        if name.trim() != name {
            renamed.push(name.clone());
        }
        missing_total += column.null_count();
        println!(
            "{:<24} {:<12} {:<12} {:<10} {:<10}",
            truncate_str(&format!("{:?}", name), 23),
            ColumnKind::of(column.dtype()).as_str(),
            column.dtype().to_string(),
            column.null_count(),
            column.as_materialized_series().n_unique()?
        );
    }
    println!();

    println!("CLEANING PREVIEW");
    println!("{}", "-".repeat(40));
    if renamed.is_empty() {
        println!("  No column names need trimming");
    } else {
        println!("  Will trim column names: {:?}", renamed);
    }

    let duplicate_count = data.height()
        - data
            .unique_stable(None, UniqueKeepStrategy::First, None)?
            .height();
    if duplicate_count > 0 {
        println!("  Will remove {} duplicate rows", duplicate_count);
    } else {
        println!("  No duplicate rows found");
    }

    if missing_total > 0 {
        println!("  Will fill {} missing values (numeric: mean, categorical: mode)", missing_total);
    } else {
        println!("  No missing values found");
    }
    println!(
        "  Will remove rows with |z| >= {} in any numeric column",
        config.z_threshold
    );
    println!();

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    println!("  - {}", config.output_path().display());
    if args.emit_report {
        println!(
            "  - {}",
            config
                .prepared_dir()
                .join(format!("{}_report.json", output_stem(config)))
                .display()
        );
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To execute the cleaning, run without --dry-run");
    if !args.emit_report {
        println!("Add --emit-report to save a detailed JSON report");
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a human-readable summary of the cleaning results.
///
/// This is the default output when `--json` is not given.
fn print_human_readable_summary(report: &CleaningReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.original_shape.rows, summary.original_shape.columns
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.cleaned_shape.rows, summary.cleaned_shape.columns
        );
    }
    println!();

    println!("Cleaning Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed, {:.1}%)",
        summary.original_shape.rows,
        summary.cleaned_shape.rows,
        report.rows_removed,
        report.rows_removed_percent
    );
    println!("  Duplicates removed: {}", summary.duplicates_removed);
    println!(
        "  Outliers removed: {} (z-threshold {})",
        summary.outliers_removed, summary.z_threshold
    );
    println!("  Values imputed: {}", report.values_imputed);
    println!();

    if !summary.renamed_columns.is_empty() {
        println!("Renamed Columns:");
        for renamed in &summary.renamed_columns {
            println!("  - {}", renamed);
        }
        println!();
    }

    if !summary.column_fills.is_empty() {
        println!("Filled Columns:");
        for fill in &summary.column_fills {
            println!(
                "  - {} ({}): {} values with {}",
                fill.column,
                fill.kind.as_str(),
                fill.filled_count,
                fill.fill_value
            );
        }
        println!();
    }

    println!("{}", "=".repeat(80));
}
