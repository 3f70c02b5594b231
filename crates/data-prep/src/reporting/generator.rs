use crate::error::Result;
use crate::types::CleaningSummary;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Audit report for one cleaning run.
///
/// Used both for JSON on stdout (`--json`) and the report file written
/// next to the cleaned data (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Local timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file, if one was written
    pub output_file: Option<String>,

    /// Rows removed by all stages together
    pub rows_removed: usize,
    pub rows_removed_percent: f32,
    /// Cells filled by imputation
    pub values_imputed: usize,

    /// Per-stage detail
    pub summary: CleaningSummary,
}

/// Writes cleaning reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Build a report from a finished run.
    pub fn build_report(
        input_file: &Path,
        output_file: Option<&Path>,
        summary: &CleaningSummary,
    ) -> CleaningReport {
        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.display().to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            rows_removed: summary.rows_removed(),
            rows_removed_percent: summary.rows_removed_percentage(),
            values_imputed: summary.values_imputed(),
            summary: summary.clone(),
        }
    }

    /// Write `report` as pretty JSON to `<output_dir>/<stem>_report.json`.
    ///
    /// Returns the path of the written file.
    pub fn write_report(&self, report: &CleaningReport, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnFill, FillValue, Shape};
    use crate::utils::ColumnKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn summary() -> CleaningSummary {
        let mut summary = CleaningSummary::new(Shape { rows: 8, columns: 2 }, 3.0);
        summary.duplicates_removed = 1;
        summary.outliers_removed = 1;
        summary.cleaned_shape = Shape { rows: 6, columns: 2 };
        summary.column_fills.push(ColumnFill {
            column: "age".to_string(),
            kind: ColumnKind::Numeric,
            fill_value: FillValue::Mean(41.5),
            filled_count: 2,
        });
        summary
    }

    #[test]
    fn test_build_report_totals() {
        let report = ReportGenerator::build_report(
            Path::new("data/raw/in.csv"),
            Some(Path::new("data/prepared/out.csv")),
            &summary(),
        );

        assert_eq!(report.rows_removed, 2);
        assert_eq!(report.values_imputed, 2);
        assert!((report.rows_removed_percent - 25.0).abs() < 1e-4);
        assert_eq!(report.output_file.as_deref(), Some("data/prepared/out.csv"));
    }

    #[test]
    fn test_write_report_file() {
        let dir = TempDir::new().unwrap();
        let generator = ReportGenerator::new(dir.path().join("reports"));
        let report = ReportGenerator::build_report(Path::new("in.csv"), None, &summary());

        let path = generator.write_report(&report, "customers").unwrap();
        assert_eq!(path, dir.path().join("reports").join("customers_report.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows_removed"], 2);
        assert_eq!(value["summary"]["duplicates_removed"], 1);
        assert_eq!(value["summary"]["column_fills"][0]["fill_value"]["statistic"], "mean");
        assert_eq!(value["summary"]["column_fills"][0]["kind"], "numeric");
        assert!(value["output_file"].is_null());
    }
}
