//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default z-score threshold for outlier removal, in standard deviations.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Default input file name, resolved under `<data_dir>/raw`.
pub const DEFAULT_INPUT_FILE: &str = "customers_data.csv";

/// Default output file name, resolved under `<data_dir>/prepared`.
pub const DEFAULT_OUTPUT_FILE: &str = "customer_data_prepared.csv";

const RAW_SUBDIR: &str = "raw";
const PREPARED_SUBDIR: &str = "prepared";

/// Configuration for the cleaning pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use data_prep::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .input_file("orders.csv")
///     .z_threshold(2.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory holding `raw/` and `prepared/`.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Name of the raw input file inside `raw/`.
    /// Default: "customers_data.csv"
    pub input_file: String,

    /// Name of the cleaned output file inside `prepared/`.
    /// Default: "customer_data_prepared.csv"
    pub output_file: String,

    /// Rows with |z| at or above this value on any numeric column are removed.
    /// Default: 3.0
    pub z_threshold: f64,

    /// Field delimiter used for both reading and writing.
    /// Default: b','
    pub separator: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            input_file: DEFAULT_INPUT_FILE.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            z_threshold: DEFAULT_Z_THRESHOLD,
            separator: b',',
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| PrepError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Directory the raw input is read from.
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join(RAW_SUBDIR)
    }

    /// Directory the cleaned output is written to.
    pub fn prepared_dir(&self) -> PathBuf {
        self.data_dir.join(PREPARED_SUBDIR)
    }

    /// Full path of the raw input file.
    pub fn input_path(&self) -> PathBuf {
        self.raw_dir().join(&self.input_file)
    }

    /// Full path of the cleaned output file.
    pub fn output_path(&self) -> PathBuf {
        self.prepared_dir().join(&self.output_file)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        validate_z_threshold(self.z_threshold)?;

        if self.input_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFileName("input_file"));
        }

        if self.output_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFileName("output_file"));
        }

        if matches!(self.separator, b'"' | b'\n' | b'\r') {
            return Err(ConfigValidationError::InvalidSeparator(
                self.separator as char,
            ));
        }

        Ok(())
    }
}

/// Check that a z-score threshold is usable.
pub fn validate_z_threshold(value: f64) -> std::result::Result<(), ConfigValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigValidationError::InvalidZThreshold(value));
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid z-score threshold: {0} (must be a finite number greater than 0)")]
    InvalidZThreshold(f64),

    #[error("Invalid '{0}': file name must not be empty")]
    EmptyFileName(&'static str),

    #[error("Invalid separator: {0:?} (quotes and line breaks are reserved)")]
    InvalidSeparator(char),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    data_dir: Option<PathBuf>,
    input_file: Option<String>,
    output_file: Option<String>,
    z_threshold: Option<f64>,
    separator: Option<u8>,
}

impl PipelineConfigBuilder {
    /// Start from an existing configuration, e.g. one loaded from JSON.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            data_dir: Some(config.data_dir),
            input_file: Some(config.input_file),
            output_file: Some(config.output_file),
            z_threshold: Some(config.z_threshold),
            separator: Some(config.separator),
        }
    }

    /// Set the root data directory (parent of `raw/` and `prepared/`).
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the raw input file name.
    pub fn input_file(mut self, name: impl Into<String>) -> Self {
        self.input_file = Some(name.into());
        self
    }

    /// Set the cleaned output file name.
    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    /// Set the z-score threshold used for outlier removal.
    ///
    /// Larger thresholds retain more rows.
    pub fn z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = Some(threshold);
        self
    }

    /// Set the field delimiter.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            input_file: self.input_file.unwrap_or(defaults.input_file),
            output_file: self.output_file.unwrap_or(defaults.output_file),
            z_threshold: self.z_threshold.unwrap_or(defaults.z_threshold),
            separator: self.separator.unwrap_or(defaults.separator),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.z_threshold, 3.0);
        assert_eq!(config.input_file, "customers_data.csv");
        assert_eq!(config.output_file, "customer_data_prepared.csv");
        assert_eq!(config.separator, b',');
    }

    #[test]
    fn test_derived_paths() {
        let config = PipelineConfig::builder()
            .data_dir("/srv/analytics/data")
            .build()
            .unwrap();
        assert_eq!(
            config.input_path(),
            PathBuf::from("/srv/analytics/data/raw/customers_data.csv")
        );
        assert_eq!(
            config.output_path(),
            PathBuf::from("/srv/analytics/data/prepared/customer_data_prepared.csv")
        );
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .input_file("orders.csv")
            .output_file("orders_clean.csv")
            .z_threshold(2.5)
            .separator(b';')
            .build()
            .unwrap();

        assert_eq!(config.input_file, "orders.csv");
        assert_eq!(config.output_file, "orders_clean.csv");
        assert_eq!(config.z_threshold, 2.5);
        assert_eq!(config.separator, b';');
    }

    #[test]
    fn test_validation_invalid_threshold() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = PipelineConfig::builder().z_threshold(bad).build();
            assert!(matches!(
                result.unwrap_err(),
                ConfigValidationError::InvalidZThreshold(_)
            ));
        }
    }

    #[test]
    fn test_validation_empty_file_name() {
        let result = PipelineConfig::builder().input_file("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyFileName("input_file")
        ));
    }

    #[test]
    fn test_validation_reserved_separator() {
        let result = PipelineConfig::builder().separator(b'"').build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSeparator('"')
        ));
    }

    #[test]
    fn test_builder_from_config_overrides() {
        let base = PipelineConfig::builder().z_threshold(4.0).build().unwrap();
        let config = PipelineConfigBuilder::from_config(base)
            .input_file("other.csv")
            .build()
            .unwrap();
        assert_eq!(config.z_threshold, 4.0);
        assert_eq!(config.input_file, "other.csv");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "input_file": "sales.csv", "z_threshold": 2.0 }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.input_file, "sales.csv");
        assert_eq!(config.z_threshold, 2.0);
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
