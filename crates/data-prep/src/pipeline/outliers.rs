//! Outlier removal module.
//!
//! Drops rows whose value in any numeric column lies too many population
//! standard deviations away from that column's mean.

use crate::config::validate_z_threshold;
use crate::error::{PrepError, Result, ResultExt};
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use crate::types::Shape;
use crate::utils::{ColumnKind, columns_of_kind, numeric_values, population_mean_std};
use polars::prelude::*;

/// Z-score based row filter.
pub struct OutlierFilter;

impl OutlierFilter {
    /// Per-row z-scores of one numeric column.
    ///
    /// Uses the population mean and standard deviation of the non-null
    /// values. A constant column (σ = 0) scores every row as 0. Null cells
    /// score `None`.
    pub fn z_scores(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
        let values = numeric_values(series)?;
        let Some((mean, std)) = population_mean_std(values.iter().flatten().copied()) else {
            return Ok(values);
        };

        let degenerate = std == 0.0 || !std.is_finite();
        Ok(values
            .into_iter()
            .map(|v| v.map(|val| if degenerate { 0.0 } else { (val - mean) / std }))
            .collect())
    }

    /// Remove rows with |z| >= `z_threshold` on any numeric column.
    ///
    /// Categorical columns are ignored. Returns the filtered table and the
    /// number of rows removed.
    pub fn remove_outliers(
        df: DataFrame,
        z_threshold: f64,
        reporter: &dyn ProgressReporter,
    ) -> Result<(DataFrame, usize)> {
        validate_z_threshold(z_threshold).map_err(|e| PrepError::InvalidConfig(e.to_string()))?;

        let before = Shape::of(&df);
        reporter.report(ProgressUpdate::new(
            CleaningStage::RemovingOutliers,
            0.0,
            format!("Removing outliers with z-score threshold {} from shape {}", z_threshold, before),
        ));

        let numeric_cols = columns_of_kind(&df, ColumnKind::Numeric);
        if numeric_cols.is_empty() || before.rows == 0 {
            reporter.report(ProgressUpdate::new(
                CleaningStage::RemovingOutliers,
                1.0,
                format!("Removed 0 outlier rows; new shape {}", before),
            ));
            return Ok((df, 0));
        }

        let mut keep = vec![true; before.rows];
        for col_name in &numeric_cols {
            let series = df.column(col_name)?.as_materialized_series();
            let scores = Self::z_scores(series)
                .context(format!("Computing z-scores for '{}'", col_name))?;

            let mut flagged = 0usize;
            for (row_keep, score) in keep.iter_mut().zip(scores) {
                if let Some(z) = score
                    && z.abs() >= z_threshold
                {
                    if *row_keep {
                        flagged += 1;
                    }
                    *row_keep = false;
                }
            }

            reporter.report(ProgressUpdate::debug(
                CleaningStage::RemovingOutliers,
                format!("Column '{}' flagged {} additional rows", col_name, flagged),
            ));
        }

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let filtered = df.filter(&mask).context("Filtering outlier rows")?;
        let removed = before.rows - filtered.height();

        reporter.report(ProgressUpdate::new(
            CleaningStage::RemovingOutliers,
            1.0,
            format!(
                "Removed {} outlier rows; new shape {}",
                removed,
                Shape::of(&filtered)
            ),
        ));

        Ok((filtered, removed))
    }
}
