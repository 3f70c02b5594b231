//! Reading raw input and writing prepared output.
//!
//! Both sides use the polars CSV reader/writer with a configurable field
//! separator. Failures are mapped to the input/output variants of
//! [`PrepError`] so the caller can tell a missing file from an empty or
//! unparsable one.

use crate::error::{PrepError, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, error, info};

/// Field values read as missing, in addition to empty fields.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn na_null_values() -> NullValues {
    NullValues::AllColumns(NA_TOKENS.iter().map(|token| (*token).into()).collect())
}

/// Read a delimited text file with a header row into a table.
///
/// Empty fields and the usual NA spellings (`NA`, `N/A`, `null`, `NaN`, ...)
/// are read as missing, so a numeric column holding them stays numeric.
///
/// # Errors
///
/// - [`PrepError::MissingInput`] if `path` is not an existing file
/// - [`PrepError::EmptyInput`] if the file has no header or no data rows
/// - [`PrepError::MalformedInput`] if a row cannot be parsed
pub fn read_raw_data(path: &Path, separator: u8) -> Result<DataFrame> {
    if !path.is_file() {
        error!("File not found: {}", path.display());
        return Err(PrepError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    if fs::metadata(path)?.len() == 0 {
        error!("File is empty: {}", path.display());
        return Err(PrepError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    info!("Reading data from {}", path.display());

    let df = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(na_null_values())),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| classify_read_error(path, e))?;

    if df.width() == 0 || df.height() == 0 {
        error!("File has no data rows: {}", path.display());
        return Err(PrepError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    info!(
        "Loaded dataframe with {} rows and {} columns",
        df.height(),
        df.width()
    );
    log_profile(&df);

    Ok(df)
}

fn classify_read_error(path: &Path, err: PolarsError) -> PrepError {
    match err {
        PolarsError::NoData(_) => {
            error!("File is empty: {}", path.display());
            PrepError::EmptyInput {
                path: path.to_path_buf(),
            }
        }
        other => {
            error!("Error parsing CSV file {}: {}", path.display(), other);
            PrepError::MalformedInput {
                path: path.to_path_buf(),
                reason: other.to_string(),
            }
        }
    }
}

/// Debug-level column profile: dtype and number of distinct values.
fn log_profile(df: &DataFrame) {
    for column in df.get_columns() {
        let unique = column
            .as_materialized_series()
            .n_unique()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "?".to_string());
        debug!(
            "  {}: {} ({} unique values)",
            column.name(),
            column.dtype(),
            unique
        );
    }
}

/// Write the cleaned table as delimited text, header included, no index column.
///
/// The parent directory is created if needed.
///
/// # Errors
///
/// [`PrepError::WriteFailed`] wrapping the underlying IO or polars error.
pub fn save_prepared_data(df: &mut DataFrame, path: &Path, separator: u8) -> Result<()> {
    match write_csv(df, path, separator) {
        Ok(()) => {
            info!("Saved prepared data to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Failed to save prepared data to {}: {}", path.display(), e);
            Err(PrepError::WriteFailed {
                path: path.to_path_buf(),
                source: Box::new(e),
            })
        }
    }
}

fn write_csv(df: &mut DataFrame, path: &Path, separator: u8) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .with_quote_char(b'"')
        .finish(df)?;

    Ok(())
}
