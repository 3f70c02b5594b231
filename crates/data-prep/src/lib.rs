//! Tabular Data Cleaning Library
//!
//! A batch cleaning pipeline for delimited tabular data built with Rust and Polars.
//!
//! # Overview
//!
//! A fixed sequence of transformations is applied to one table:
//!
//! - **Column names**: surrounding whitespace is trimmed
//! - **Duplicates**: exact duplicate rows are dropped, first occurrence kept
//! - **Missing values**: numeric columns are filled with their mean, categorical
//!   columns with their mode
//! - **Outliers**: rows with a z-score at or above the threshold in any numeric
//!   column are dropped
//!
//! Every stage reports what it changed through an injected [`ProgressReporter`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_prep::{Pipeline, PipelineConfig};
//!
//! // File to file, using <data_dir>/raw and <data_dir>/prepared
//! let config = PipelineConfig::builder()
//!     .data_dir("data")
//!     .input_file("customers_data.csv")
//!     .z_threshold(3.0)
//!     .build()?;
//!
//! let result = Pipeline::builder().config(config).build()?.run()?;
//! println!("{} -> {}", result.summary.original_shape, result.summary.cleaned_shape);
//!
//! // In memory, capturing stage messages
//! let result = Pipeline::builder()
//!     .on_progress(|update| println!("[{:?}] {}", update.stage, update.message))
//!     .build()?
//!     .process(df)?;
//! ```
//!
//! # Stages
//!
//! Each stage can also be used on its own. They consume a `DataFrame` and
//! return the transformed table together with what they did:
//!
//! ```rust,ignore
//! use data_prep::{DuplicateRemover, OutlierFilter, StatisticalImputer, TracingReporter};
//!
//! let (df, duplicates) = DuplicateRemover::remove_duplicates(df, &TracingReporter)?;
//! let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter)?;
//! let (df, outliers) = OutlierFilter::remove_outliers(df, 3.0, &TracingReporter)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{ColumnNormalizer, DuplicateRemover};
pub use config::{
    ConfigValidationError, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_Z_THRESHOLD,
    PipelineConfig, PipelineConfigBuilder,
};
pub use error::{PrepError, Result, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{read_raw_data, save_prepared_data};
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, LogLevel, OutlierFilter, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate, TracingReporter,
};
pub use reporting::{CleaningReport, ReportGenerator};
pub use types::{CleaningSummary, ColumnFill, FillValue, PipelineResult, RenamedColumn, Shape};
pub use utils::ColumnKind;
