use crate::utils::ColumnKind;
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row and column count of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    pub fn of(df: &DataFrame) -> Self {
        Self {
            rows: df.height(),
            columns: df.width(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}

/// A column whose name changed during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedColumn {
    pub from: String,
    pub to: String,
}

impl fmt::Display for RenamedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> '{}'", self.from, self.to)
    }
}

/// Value used to fill the missing cells of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statistic", content = "value", rename_all = "snake_case")]
pub enum FillValue {
    /// Arithmetic mean of a numeric column
    Mean(f64),
    /// Most frequent value of a categorical column, in string form
    Mode(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean(mean) => write!(f, "mean {:.2}", mean),
            Self::Mode(mode) => write!(f, "mode '{}'", mode),
        }
    }
}

/// Record of one column touched by missing-value imputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFill {
    pub column: String,
    pub kind: ColumnKind,
    pub fill_value: FillValue,
    pub filled_count: usize,
}

/// Cumulative effect of one pipeline run.
///
/// Serializable so it can be printed with `--json` or written next to the
/// cleaned file as an audit report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// When processing started.
    pub started_at: DateTime<Utc>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Shape of the table as read.
    pub original_shape: Shape,
    /// Shape of the table after all stages.
    pub cleaned_shape: Shape,

    /// Columns whose names were trimmed.
    pub renamed_columns: Vec<RenamedColumn>,
    /// Rows dropped as exact duplicates.
    pub duplicates_removed: usize,
    /// Columns that received fill values, numeric first.
    pub column_fills: Vec<ColumnFill>,
    /// Rows dropped by the z-score filter.
    pub outliers_removed: usize,
    /// Threshold the z-score filter used.
    pub z_threshold: f64,
}

impl CleaningSummary {
    /// Create a summary for a run starting now.
    pub fn new(original_shape: Shape, z_threshold: f64) -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            original_shape,
            cleaned_shape: original_shape,
            renamed_columns: Vec::new(),
            duplicates_removed: 0,
            column_fills: Vec::new(),
            outliers_removed: 0,
            z_threshold,
        }
    }

    /// Total rows removed by all stages.
    pub fn rows_removed(&self) -> usize {
        self.original_shape
            .rows
            .saturating_sub(self.cleaned_shape.rows)
    }

    /// Total number of cells filled by imputation.
    pub fn values_imputed(&self) -> usize {
        self.column_fills.iter().map(|fill| fill.filled_count).sum()
    }

    /// Percentage of the original rows that were removed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.original_shape.rows == 0 {
            0.0
        } else {
            (self.rows_removed() as f32 / self.original_shape.rows as f32) * 100.0
        }
    }
}

/// Output of [`Pipeline::process`](crate::Pipeline::process).
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The cleaned table.
    pub data: DataFrame,
    /// What each stage did.
    pub summary: CleaningSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> CleaningSummary {
        let mut summary = CleaningSummary::new(Shape { rows: 10, columns: 3 }, 3.0);
        summary.cleaned_shape = Shape { rows: 7, columns: 3 };
        summary.column_fills.push(ColumnFill {
            column: "age".to_string(),
            kind: ColumnKind::Numeric,
            fill_value: FillValue::Mean(31.456),
            filled_count: 2,
        });
        summary.column_fills.push(ColumnFill {
            column: "city".to_string(),
            kind: ColumnKind::Categorical,
            fill_value: FillValue::Mode("Austin".to_string()),
            filled_count: 1,
        });
        summary
    }

    #[test]
    fn test_summary_counts() {
        let summary = summary();
        assert_eq!(summary.rows_removed(), 3);
        assert_eq!(summary.values_imputed(), 3);
        assert!((summary.rows_removed_percentage() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_fill_value_display_rounds_mean() {
        assert_eq!(FillValue::Mean(31.456).to_string(), "mean 31.46");
        assert_eq!(FillValue::Mode("x".to_string()).to_string(), "mode 'x'");
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(Shape { rows: 4, columns: 2 }.to_string(), "(4, 2)");
    }

    #[test]
    fn test_summary_json() {
        let json = serde_json::to_string(&summary()).unwrap();
        assert!(json.contains("\"statistic\":\"mean\""));
        assert!(json.contains("\"kind\":\"categorical\""));
        assert!(json.contains("\"original_shape\":{\"rows\":10,\"columns\":3}"));
    }
}
