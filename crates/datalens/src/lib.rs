//! Data Exploration Engine
//!
//! Column analysis, histogram binning and table view utilities for
//! loosely typed tabular data, built with Rust and Polars.
//!
//! # Overview
//!
//! A table is a list of [`Row`]s, each mapping column names to [`Value`]s
//! (number, text or null). Rows need not share keys. On top of that the
//! library provides:
//!
//! - **Column Analysis**: Missing-value exclusion, numeric/categorical
//!   classification, summary statistics and the mode
//! - **Histograms**: Equal-width numeric buckets or top-N category counts
//! - **Table Views**: AND-combined filters, a single-column sort with
//!   nulls last, and Pearson correlation between two columns
//! - **Curation**: Fill missing cells, convert text to numbers, trim and
//!   change case, edit single cells
//! - **Charts**: Down-sampled or grouped `{name, value}` series
//! - **Ingestion and Export**: CSV (through polars) and JSON in, CSV,
//!   JSON and text reports out
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datalens::{AnalysisConfig, ColumnAnalyzer, Filter, FilterOperator, Sort};
//! use datalens::ingest::load_table;
//! use datalens::table::apply_view;
//!
//! let rows = load_table("data/sales.csv")?;
//!
//! let view = apply_view(
//!     &rows,
//!     &[Filter::new("region", FilterOperator::Equals, "north")],
//!     Some(&Sort::desc("revenue")),
//! );
//!
//! let config = AnalysisConfig::builder().histogram_bins(5).build()?;
//! let result = ColumnAnalyzer::new(config).analyze(&view, "revenue");
//!
//! println!("{}: {:?}", result.column_name, result.column_type());
//! for bucket in &result.histogram {
//!     println!("{:>16} {}", bucket.bin, bucket.count);
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to change the bucket count, whether empty
//! strings count as missing, and the chart limits:
//!
//! ```rust,ignore
//! use datalens::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .histogram_bins(20)
//!     .exclude_empty_strings(false)
//!     .chart_max_points(500)
//!     .build()?;
//! ```

pub mod analyzer;
pub mod chart;
pub mod config;
pub mod curation;
pub mod error;
pub mod ingest;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analyzer::{
    ColumnAnalyzer, analyze_column, analyze_table, create_default_histogram, create_histogram,
    strict_column_typing,
};
pub use chart::{ChartPoint, prepare_chart_data};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use curation::{ColumnHealth, CurationOperation, column_health, curate, set_cell};
pub use error::{AnalysisError, Result as DatalensResult, ResultExt};
pub use reporting::{AnalysisReport, ReportGenerator, ReportParams};
pub use table::{apply_view, calculate_correlation, filter_rows, sort_rows};
pub use types::{
    AnalysisResult, ColumnStatistics, ColumnType, Correlation, Filter, FilterOperator,
    HistogramBin, NumericSummary, Quartiles, Row, Sort, SortDirection, Value, column_names,
};
