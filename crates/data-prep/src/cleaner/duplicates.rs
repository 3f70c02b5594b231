//! Exact-duplicate row removal.

use crate::error::{Result, ResultExt};
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use polars::prelude::*;

/// Drops rows whose values equal an earlier row in every column.
pub struct DuplicateRemover;

impl DuplicateRemover {
    /// Remove duplicate rows, keeping the first occurrence.
    ///
    /// Survivors keep their original relative order. Nulls compare equal to
    /// nulls. Returns the cleaned table and the number of rows removed.
    pub fn remove_duplicates(
        df: DataFrame,
        reporter: &dyn ProgressReporter,
    ) -> Result<(DataFrame, usize)> {
        let before = df.height();
        if before == 0 || df.width() == 0 {
            reporter.report(ProgressUpdate::new(
                CleaningStage::RemovingDuplicates,
                1.0,
                "Removed 0 duplicate rows",
            ));
            return Ok((df, 0));
        }

        let deduped = df
            .unique_stable(None, UniqueKeepStrategy::First, None)
            .context("Removing duplicate rows")?;
        let removed = before - deduped.height();

        reporter.report(ProgressUpdate::new(
            CleaningStage::RemovingDuplicates,
            1.0,
            format!("Removed {} duplicate rows", removed),
        ));

        Ok((deduped, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::progress::TracingReporter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keeps_first_occurrence() {
        let df = df![
            "a" => [1i64, 1, 2],
            "b" => ["x", "x", "y"],
        ]
        .unwrap();

        let (cleaned, removed) = DuplicateRemover::remove_duplicates(df, &TracingReporter).unwrap();

        let expected = df![
            "a" => [1i64, 2],
            "b" => ["x", "y"],
        ]
        .unwrap();
        assert_eq!(removed, 1);
        assert!(cleaned.equals(&expected));
    }

    #[test]
    fn test_preserves_order_of_survivors() {
        let df = df![
            "id" => [3i64, 1, 3, 2, 1],
        ]
        .unwrap();

        let (cleaned, removed) = DuplicateRemover::remove_duplicates(df, &TracingReporter).unwrap();
        let ids: Vec<Option<i64>> = cleaned
            .column("id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(removed, 2);
        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_partial_match_is_not_duplicate() {
        let df = df![
            "a" => [1i64, 1],
            "b" => ["x", "y"],
        ]
        .unwrap();

        let (cleaned, removed) = DuplicateRemover::remove_duplicates(df, &TracingReporter).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_null_rows_compare_equal() {
        let df = df![
            "a" => [None, None, Some(1.0)],
            "b" => [Some("x"), Some("x"), None],
        ]
        .unwrap();

        let (cleaned, removed) = DuplicateRemover::remove_duplicates(df, &TracingReporter).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_empty_table() {
        let df = df!["a" => Vec::<i64>::new()].unwrap();
        let (cleaned, removed) = DuplicateRemover::remove_duplicates(df, &TracingReporter).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(cleaned.height(), 0);
        assert_eq!(cleaned.width(), 1);
    }

    #[test]
    fn test_idempotent() {
        let df = df![
            "a" => [1i64, 2, 1, 3, 2],
            "b" => ["p", "q", "p", "r", "q"],
        ]
        .unwrap();

        let (once, _) = DuplicateRemover::remove_duplicates(df, &TracingReporter).unwrap();
        let (twice, removed_again) =
            DuplicateRemover::remove_duplicates(once.clone(), &TracingReporter).unwrap();

        assert_eq!(removed_again, 0);
        assert!(once.equals(&twice));
    }
}
