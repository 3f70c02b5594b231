//! Column-name normalization.

use crate::error::{PrepError, Result, ResultExt};
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use crate::types::RenamedColumn;
use polars::prelude::*;
use std::collections::HashSet;

/// Trims surrounding whitespace from column names.
pub struct ColumnNormalizer;

impl ColumnNormalizer {
    /// Trim every column name, keeping column order.
    ///
    /// Returns the renamed table and the list of names that changed. Fails
    /// with [`PrepError::DuplicateColumn`] if two names collide once trimmed.
    pub fn normalize_column_names(
        mut df: DataFrame,
        reporter: &dyn ProgressReporter,
    ) -> Result<(DataFrame, Vec<RenamedColumn>)> {
        let original: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let trimmed: Vec<String> = original.iter().map(|s| s.trim().to_string()).collect();

        let mut seen = HashSet::with_capacity(trimmed.len());
        for name in &trimmed {
            if !seen.insert(name.as_str()) {
                return Err(PrepError::DuplicateColumn(name.clone()));
            }
        }

        let renamed: Vec<RenamedColumn> = original
            .iter()
            .zip(&trimmed)
            .filter(|(old, new)| old != new)
            .map(|(old, new)| RenamedColumn {
                from: old.clone(),
                to: new.clone(),
            })
            .collect();

        if renamed.is_empty() {
            reporter.report(ProgressUpdate::debug(
                CleaningStage::NormalizingColumns,
                "Column names already trimmed",
            ));
            return Ok((df, renamed));
        }

        for column in &renamed {
            df.rename(&column.from, column.to.as_str().into())
                .context(format!("Renaming column '{}'", column.from))?;
        }

        let listing: Vec<String> = renamed.iter().map(|r| r.to_string()).collect();
        reporter.report(ProgressUpdate::new(
            CleaningStage::NormalizingColumns,
            1.0,
            format!("Renamed columns: {}", listing.join(", ")),
        ));

        Ok((df, renamed))
    }
}
