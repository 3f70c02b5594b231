//! Shared utilities for the cleaning pipeline.
//!
//! This module contains the column-kind dispatch and the small statistics
//! helpers used by more than one cleaning stage.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Column Kind Utilities
// =============================================================================

/// Semantic kind of a column for cleaning purposes.
///
/// Every stage dispatches on this tag rather than on raw polars dtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Anything else: text, booleans, dates
    Categorical,
}

impl ColumnKind {
    /// Classify a polars dtype.
    pub fn of(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }

    /// Lower-case label used in log messages and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Names of the columns of the given kind, in table column order.
pub fn columns_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == kind)
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Read a numeric Series as `f64` values.
///
/// Nulls and NaN cells both come back as `None`; either one is a missing value.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Population mean and standard deviation (ddof = 0) of the given values.
///
/// Returns `None` when there are no values.
pub fn population_mean_std<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Mode of a Series together with the row index of its first occurrence.
///
/// Values are compared by their string form, so this works for any dtype.
/// Ties on frequency go to the value seen first in row order.
/// Returns `None` if the Series has no non-null values.
pub fn mode_with_first_index(series: &Series) -> PolarsResult<Option<(String, usize)>> {
    let str_series = series.cast(&DataType::String)?;
    let str_chunked = str_series.str()?;

    // value -> (count, first row index)
    let mut value_counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, val) in str_chunked.into_iter().enumerate() {
        if let Some(val) = val {
            value_counts.entry(val).or_insert((0, idx)).0 += 1;
        }
    }

    let best = value_counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(val, (_, first))| (val.to_string(), first));

    Ok(best)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<f64> = numeric_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a Series with the value stored at `source_row`.
///
/// Works for every dtype and keeps it unchanged, which is what categorical
/// imputation needs for boolean and temporal columns.
pub fn fill_nulls_from_row(series: &Series, source_row: usize) -> PolarsResult<Series> {
    let indices: Vec<IdxSize> = series
        .is_null()
        .into_iter()
        .enumerate()
        .map(|(idx, is_null)| {
            if is_null.unwrap_or(false) {
                source_row as IdxSize
            } else {
                idx as IdxSize
            }
        })
        .collect();

    let idx = IdxCa::from_vec("idx".into(), indices);
    series.take(&idx)
}

// =============================================================================
// Tests
// =============================================================================
