use crate::error::{Result, ResultExt};
use crate::table::calculate_correlation;
use crate::types::{AnalysisResult, Correlation, Filter, Row, Sort, column_names};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Full analysis of one table view, for `--json` output and `--report` files.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,
    /// Where the rows came from
    pub source: String,
    /// Rows in the loaded table
    pub total_rows: usize,
    /// Rows left after filtering
    pub row_count: usize,
    /// Columns of the loaded table
    pub column_count: usize,
    /// Filters applied before analysis
    pub filters: Vec<Filter>,
    /// Sort applied to the view
    pub sort: Option<Sort>,
    /// Per-column analysis
    pub columns: Vec<AnalysisResult>,
    /// Requested column correlations
    pub correlations: Vec<CorrelationEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationEntry {
    pub x: String,
    pub y: String,
    pub correlation: Correlation,
}

/// Inputs for [`ReportGenerator::build_report`].
#[derive(Debug, Clone, Copy)]
pub struct ReportParams<'a> {
    pub source: &'a str,
    /// The table as loaded.
    pub table: &'a [Row],
    /// The filtered and sorted view that was analyzed.
    pub view: &'a [Row],
    pub filters: &'a [Filter],
    pub sort: Option<&'a Sort>,
    pub columns: &'a [AnalysisResult],
    pub correlation_pairs: &'a [(String, String)],
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds [`AnalysisReport`]s and writes them to disk.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Assemble a report, computing each requested correlation on the view.
    pub fn build_report(params: ReportParams<'_>) -> AnalysisReport {
        let correlations = params
            .correlation_pairs
            .iter()
            .map(|(x, y)| CorrelationEntry {
                x: x.clone(),
                y: y.clone(),
                correlation: calculate_correlation(params.view, x, y),
            })
            .collect();

        AnalysisReport {
            generated_at: Local::now().to_rfc3339(),
            source: params.source.to_string(),
            total_rows: params.table.len(),
            row_count: params.view.len(),
            column_count: column_names(params.table).len(),
            filters: params.filters.to_vec(),
            sort: params.sort.cloned(),
            columns: params.columns.to_vec(),
            correlations,
        }
    }

    /// Write a report as pretty JSON to `<output_dir>/<base_name>_analysis.json`.
    pub fn write_report_to_file(&self, report: &AnalysisReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self.output_dir.join(format!("{}_analysis.json", base_name));
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_table;
    use crate::table::apply_view;
    use crate::types::FilterOperator;
    use pretty_assertions::assert_eq;

    fn table() -> Vec<Row> {
        (1..=6)
            .map(|i| Row::new().with("x", i).with("y", i * 3).with("tag", "t"))
            .collect()
    }

    fn report_for(table: &[Row], filters: &[Filter]) -> AnalysisReport {
        let view = apply_view(table, filters, None);
        let columns = analyze_table(&view);
        ReportGenerator::build_report(ReportParams {
            source: "memory",
            table,
            view: &view,
            filters,
            sort: None,
            columns: &columns,
            correlation_pairs: &[
                ("x".to_string(), "y".to_string()),
                ("x".to_string(), "tag".to_string()),
            ],
        })
    }

    #[test]
    fn test_build_report_counts() {
        let table = table();
        let filters = [Filter::new("x", FilterOperator::Greater, "2")];
        let report = report_for(&table, &filters);

        assert_eq!(report.total_rows, 6);
        assert_eq!(report.row_count, 4);
        assert_eq!(report.column_count, 3);
        assert_eq!(report.columns.len(), 3);
        assert_eq!(report.filters, filters.to_vec());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_report_correlations_serialize() {
        let report = report_for(&table(), &[]);
        let json = serde_json::to_value(&report).unwrap();

        let first = json["correlations"][0]["correlation"].as_f64().unwrap();
        assert!((first - 1.0).abs() < 1e-12);
        assert_eq!(
            json["correlations"][1]["correlation"],
            "Insufficient or mismatched data"
        );
        assert_eq!(json["columns"][0]["type"], "numeric");
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = std::env::temp_dir().join(format!("datalens_report_{}", std::process::id()));
        let generator = ReportGenerator::new(dir.clone());
        let report = report_for(&table(), &[]);

        let path = generator.write_report_to_file(&report, "table").unwrap();
        assert!(path.ends_with("table_analysis.json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["row_count"], 6);

        fs::remove_dir_all(dir).ok();
    }
}
