//! Report generation module.
//!
//! Turns a [`CleaningSummary`](crate::types::CleaningSummary) into a
//! [`CleaningReport`] suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//!
//! # Example
//!
//! ```rust,ignore
//! use data_prep::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report(&input_path, Some(&output_path), &result.summary);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(config.prepared_dir());
//! generator.write_report(&report, "customers")?;
//! ```

mod generator;

pub use generator::{CleaningReport, ReportGenerator};
