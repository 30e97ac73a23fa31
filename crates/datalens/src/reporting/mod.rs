//! Report generation module.
//!
//! This module covers everything that leaves the engine:
//! - [`write_rows_csv`] / [`write_rows_json`] export a table view
//! - [`analysis_text_report`] renders analysis results as plain text
//! - [`ReportGenerator`] assembles an [`AnalysisReport`] (analysis,
//!   correlations and view settings) and writes it as JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use datalens::reporting::{ReportGenerator, ReportParams};
//!
//! let report = ReportGenerator::build_report(ReportParams {
//!     source: "data/sales.csv",
//!     table: &rows,
//!     view: &view,
//!     filters: &filters,
//!     sort: None,
//!     columns: &results,
//!     correlation_pairs: &[],
//! });
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod export;
mod generator;

pub use export::{analysis_text_report, write_rows_csv, write_rows_json};
pub use generator::{AnalysisReport, CorrelationEntry, ReportGenerator, ReportParams};
