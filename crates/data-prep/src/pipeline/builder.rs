//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! sequencing the cleaning stages.

use crate::cleaner::{ColumnNormalizer, DuplicateRemover};
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::io::{read_raw_data, save_prepared_data};
use crate::pipeline::outliers::OutlierFilter;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate, TracingReporter,
};
use crate::types::{CleaningSummary, PipelineResult, Shape};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// The cleaning pipeline.
///
/// Runs a fixed sequence: column-name trimming, duplicate removal,
/// missing-value imputation, outlier removal. Use [`Pipeline::builder()`]
/// to create one.
///
/// # Example
///
/// ```rust,ignore
/// use data_prep::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().z_threshold(2.5).build()?)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .process(dataframe)?;
///
/// println!("{} -> {}", result.summary.original_shape, result.summary.cleaned_shape);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the configured input, clean it and write the configured output.
    ///
    /// Output is only written once every stage has succeeded.
    pub fn run(&self) -> Result<PipelineResult> {
        let input_path = self.config.input_path();
        let df = read_raw_data(&input_path, self.config.separator)?;

        let mut result = self.process(df)?;

        let output_path = self.config.output_path();
        save_prepared_data(&mut result.data, &output_path, self.config.separator)?;

        Ok(result)
    }

    /// Clean a table in memory.
    ///
    /// Returns the cleaned table together with a [`CleaningSummary`] of what
    /// each stage did.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaning finished in {}ms",
                    result.summary.duration_ms
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(format!("Pipeline error: {}", e)));
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        self.reporter.report(update);
    }

    fn process_internal(&self, df: DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let reporter = self.reporter.as_ref();

        let original_shape = Shape::of(&df);
        let mut summary = CleaningSummary::new(original_shape, self.config.z_threshold);

        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.5,
            format!("Initial columns: {}", column_names.join(", ")),
        ));
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            1.0,
            format!("Initial shape: {}", original_shape),
        ));

        let (df, renamed) = ColumnNormalizer::normalize_column_names(df, reporter)?;
        summary.renamed_columns = renamed;

        let (df, duplicates_removed) = DuplicateRemover::remove_duplicates(df, reporter)?;
        summary.duplicates_removed = duplicates_removed;

        let (df, column_fills) = StatisticalImputer::handle_missing_values(df, reporter)?;
        summary.column_fills = column_fills;

        let (df, outliers_removed) =
            OutlierFilter::remove_outliers(df, self.config.z_threshold, reporter)?;
        summary.outliers_removed = outliers_removed;

        summary.cleaned_shape = Shape::of(&df);
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Complete,
            1.0,
            format!("Original shape: {}", summary.original_shape),
        ));
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Complete,
            1.0,
            format!("Cleaned shape : {}", summary.cleaned_shape),
        ));

        Ok(PipelineResult { data: df, summary })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set where stage messages are sent.
    ///
    /// Defaults to [`TracingReporter`].
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Receive stage messages through a closure.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let pipeline = Pipeline::builder()
    ///     .on_progress(|update| {
    ///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
    ///     })
    ///     .build()?;
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            reporter: self
                .progress_reporter
                .unwrap_or_else(|| Arc::new(TracingReporter)),
        })
    }
}
