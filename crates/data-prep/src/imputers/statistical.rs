//! Statistical imputation methods.
//!
//! Provides mean imputation for numeric columns and mode imputation for
//! categorical columns.

use crate::error::{PrepError, Result, ResultExt};
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use crate::types::{ColumnFill, FillValue};
use crate::utils::{
    ColumnKind, columns_of_kind, fill_nulls_from_row, fill_numeric_nulls, mode_with_first_index,
    numeric_values, population_mean_std,
};
use polars::prelude::*;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every missing cell in the table.
    ///
    /// Numeric columns are processed first, then categorical columns, each
    /// group in table column order. Columns without missing values are left
    /// untouched. A column in which every value is missing has no defined
    /// mean or mode and fails with [`PrepError::UndefinedStatistic`].
    pub fn handle_missing_values(
        mut df: DataFrame,
        reporter: &dyn ProgressReporter,
    ) -> Result<(DataFrame, Vec<ColumnFill>)> {
        let mut fills = Vec::new();

        if df.height() == 0 {
            reporter.report(ProgressUpdate::debug(
                CleaningStage::ImputingValues,
                "Table is empty, nothing to impute",
            ));
            return Ok((df, fills));
        }

        let numeric_cols = columns_of_kind(&df, ColumnKind::Numeric);
        let categorical_cols = columns_of_kind(&df, ColumnKind::Categorical);
        let total = numeric_cols.len() + categorical_cols.len();

        let ordered = numeric_cols
            .iter()
            .map(|name| (name, ColumnKind::Numeric))
            .chain(categorical_cols.iter().map(|name| (name, ColumnKind::Categorical)));

        for (done, (col_name, kind)) in ordered.enumerate() {
            let fill = match kind {
                ColumnKind::Numeric => Self::apply_numeric_mean(&mut df, col_name)?,
                ColumnKind::Categorical => Self::apply_mode_imputation(&mut df, col_name)?,
            };

            let stage_progress = (done + 1) as f32 / total as f32;
            match fill {
                Some(fill) => {
                    reporter.report(ProgressUpdate::new(
                        CleaningStage::ImputingValues,
                        stage_progress,
                        format!(
                            "Filled {} missing values in '{}' with {}",
                            fill.filled_count, fill.column, fill.fill_value
                        ),
                    ));
                    fills.push(fill);
                }
                None => reporter.report(ProgressUpdate::debug(
                    CleaningStage::ImputingValues,
                    format!("No missing values in {} column '{}'", kind.as_str(), col_name),
                )),
            }
        }

        Ok((df, fills))
    }

    /// Fill the missing values of a numeric column with its mean.
    ///
    /// Null and NaN cells both count as missing. Returns `None` if the column
    /// had nothing to fill. The filled column becomes `Float64` and stores the
    /// unrounded mean.
    pub fn apply_numeric_mean(df: &mut DataFrame, col_name: &str) -> Result<Option<ColumnFill>> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let values = numeric_values(&series)
            .context(format!("Reading '{}' as numbers", col_name))?;
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing == 0 {
            return Ok(None);
        }

        let (mean, _) = population_mean_std(values.into_iter().flatten()).ok_or_else(|| {
            PrepError::UndefinedStatistic {
                column: col_name.to_string(),
                statistic: "mean",
            }
        })?;

        let filled = fill_numeric_nulls(&series, mean)
            .context(format!("Filling '{}' with its mean", col_name))?;
        df.replace(col_name, filled)?;

        Ok(Some(ColumnFill {
            column: col_name.to_string(),
            kind: ColumnKind::Numeric,
            fill_value: FillValue::Mean(mean),
            filled_count: missing,
        }))
    }

    /// Fill the missing values of a categorical column with its mode.
    ///
    /// Ties on frequency go to the value that appears first in the column.
    /// The column keeps its dtype.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
    ) -> Result<Option<ColumnFill>> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let missing = series.null_count();
        if missing == 0 {
            return Ok(None);
        }

        let (mode, first_row) = mode_with_first_index(&series)
            .context(format!("Computing mode of '{}'", col_name))?
            .ok_or_else(|| PrepError::UndefinedStatistic {
                column: col_name.to_string(),
                statistic: "mode",
            })?;

        let filled = fill_nulls_from_row(&series, first_row)
            .context(format!("Filling '{}' with its mode", col_name))?;
        df.replace(col_name, filled)?;

        Ok(Some(ColumnFill {
            column: col_name.to_string(),
            kind: ColumnKind::Categorical,
            fill_value: FillValue::Mode(mode),
            filled_count: missing,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::progress::{ClosureProgressReporter, TracingReporter};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_numeric_mean_fill() {
        let df = df!["a" => [Some(1i64), Some(2), None, Some(3)]].unwrap();

        let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        assert_eq!(f64_values(&df, "a"), vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].fill_value, FillValue::Mean(2.0));
        assert_eq!(fills[0].filled_count, 1);
    }

    #[test]
    fn test_nan_cells_are_filled_like_nulls() {
        let df = df!["a" => [Some(1.0), Some(f64::NAN), None, Some(3.0)]].unwrap();

        let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        assert_eq!(f64_values(&df, "a"), vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
        assert_eq!(fills[0].fill_value, FillValue::Mean(2.0));
        assert_eq!(fills[0].filled_count, 2);
    }

    #[test]
    fn test_all_nan_column_has_no_mean() {
        let df = df!["a" => [f64::NAN, f64::NAN]].unwrap();
        let err = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
    }

    #[test]
    fn test_mean_is_stored_unrounded() {
        let df = df!["a" => [Some(1.0), Some(2.0), Some(2.0), None]].unwrap();
        let (df, _) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        let filled = f64_values(&df, "a")[3].unwrap();
        assert!((filled - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_categorical_mode_fill() {
        let df = df!["c" => [Some("x"), Some("x"), None, Some("y")]].unwrap();

        let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        assert_eq!(
            str_values(&df, "c"),
            vec![
                Some("x".to_string()),
                Some("x".to_string()),
                Some("x".to_string()),
                Some("y".to_string())
            ]
        );
        assert_eq!(fills[0].fill_value, FillValue::Mode("x".to_string()));
        assert_eq!(fills[0].kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_mode_tie_uses_first_seen_value() {
        let df = df!["c" => [Some("b"), Some("a"), None, Some("a"), Some("b")]].unwrap();
        let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        assert_eq!(fills[0].fill_value, FillValue::Mode("b".to_string()));
        assert_eq!(str_values(&df, "c")[2], Some("b".to_string()));
    }

    #[test]
    fn test_boolean_column_keeps_dtype() {
        let df = df!["active" => [Some(true), None, Some(true), Some(false)]].unwrap();
        let (df, _) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        let column = df.column("active").unwrap();
        assert_eq!(column.dtype(), &DataType::Boolean);
        assert_eq!(column.null_count(), 0);
    }

    #[test]
    fn test_columns_without_missing_are_untouched() {
        let df = df![
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"],
        ]
        .unwrap();

        let (cleaned, fills) =
            StatisticalImputer::handle_missing_values(df.clone(), &TracingReporter).unwrap();

        assert!(fills.is_empty());
        assert!(cleaned.equals(&df));
        assert_eq!(cleaned.column("a").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_no_missing_values_survive() {
        let df = df![
            "age" => [Some(30.0), None, Some(40.0), None],
            "city" => [None, Some("Austin"), Some("Boise"), Some("Austin")],
            "visits" => [Some(1i64), Some(2), None, Some(4)],
        ]
        .unwrap();

        let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();

        let remaining: usize = df.get_columns().iter().map(|c| c.null_count()).sum();
        assert_eq!(remaining, 0);
        assert_eq!(fills.len(), 3);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_numeric_columns_logged_before_categorical() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let reporter = ClosureProgressReporter::new(move |update: ProgressUpdate| {
            sink.lock().unwrap().push(update.message);
        });

        let df = df![
            "city" => [None, Some("Austin"), Some("Austin")],
            "age" => [Some(30.0), None, Some(40.0)],
        ]
        .unwrap();
        StatisticalImputer::handle_missing_values(df, &reporter).unwrap();

        let messages = messages.lock().unwrap();
        assert_eq!(
            *messages,
            vec![
                "Filled 1 missing values in 'age' with mean 35.00".to_string(),
                "Filled 1 missing values in 'city' with mode 'Austin'".to_string(),
            ]
        );
    }

    #[test]
    fn test_entirely_missing_numeric_column_is_error() {
        let df = df![
            "a" => [None::<f64>, None],
            "b" => [1i64, 2],
        ]
        .unwrap();

        let err = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap_err();
        assert!(matches!(
            err,
            PrepError::UndefinedStatistic { ref column, statistic: "mean" } if column == "a"
        ));
    }

    #[test]
    fn test_entirely_missing_categorical_column_is_error() {
        let df = df!["c" => [None::<&str>, None]].unwrap();

        let err = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_empty_table_is_returned_unchanged() {
        let df = df!["a" => Vec::<f64>::new()].unwrap();
        let (df, fills) = StatisticalImputer::handle_missing_values(df, &TracingReporter).unwrap();
        assert!(fills.is_empty());
        assert_eq!(df.height(), 0);
    }
}
