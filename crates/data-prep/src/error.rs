//! Custom error types for the cleaning pipeline.
//!
//! This module provides the error hierarchy using `thiserror` so that every
//! failure carries enough context (file path, column name) to be diagnosed
//! from a single log line.
//!
//! Errors are serializable as `{code, message}` so a host application can
//! forward them without depending on the Rust type.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum PrepError {
    /// The input path does not resolve to an existing file.
    #[error("Input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The input file exists but holds no header or no rows.
    #[error("Input file is empty: {}", path.display())]
    EmptyInput { path: PathBuf },

    /// The input file could not be parsed into a table.
    #[error("Failed to parse input file {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    /// The cleaned table could not be persisted.
    #[error("Failed to write output file {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: Box<PrepError>,
    },

    /// A column has no non-missing value, so its fill statistic is undefined.
    #[error("Cannot compute {statistic} for column '{column}': every value is missing")]
    UndefinedStatistic {
        column: String,
        statistic: &'static str,
    },

    /// Two columns share a name after whitespace trimming.
    #[error("Column name '{0}' is duplicated after trimming whitespace")]
    DuplicateColumn(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PrepError>,
    },
}

impl PrepError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PrepError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MISSING_INPUT",
            Self::EmptyInput { .. } => "EMPTY_INPUT",
            Self::MalformedInput { .. } => "MALFORMED_INPUT",
            Self::WriteFailed { .. } => "WRITE_FAILED",
            Self::UndefinedStatistic { .. } => "UNDEFINED_STATISTIC",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the input file rather than the data.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::MissingInput { .. } | Self::EmptyInput { .. } | Self::MalformedInput { .. } => {
                true
            }
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PrepError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PrepError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PrepError::Polars(e).with_context(context))
    }
}
