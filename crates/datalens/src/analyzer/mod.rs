//! Column analysis module.
//!
//! This module turns one column of a loosely typed table into an
//! [`AnalysisResult`]:
//! - Missing value exclusion (null, absent keys and, by default, empty strings)
//! - All-or-nothing numeric classification ([`strict_column_typing`])
//! - Summary statistics (mean, nearest-rank median and quartiles, population
//!   standard deviation) or the mode for categorical columns
//! - Bounded histograms ([`create_histogram`])
//!
//! Analysis is a pure function of the rows and column name. It never fails:
//! degenerate columns produce sentinel results instead of errors.

mod classification;
mod histogram;
mod statistics;

pub use classification::strict_column_typing;
pub use histogram::{create_default_histogram, create_histogram};

pub(crate) use statistics::mean;

use crate::config::AnalysisConfig;
use crate::types::{
    AnalysisResult, ColumnStatistics, HistogramBin, NO_DATA, Row, Value, column_names,
};
use classification::{clean_values, numeric_values};
use histogram::{categorical_histogram, numeric_histogram};
use statistics::{frequencies, mode, numeric_summary};
use tracing::{debug, warn};

/// Analyzer for the columns of an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct ColumnAnalyzer {
    config: AnalysisConfig,
}

static_assertions::assert_impl_all!(ColumnAnalyzer: Send, Sync);
static_assertions::assert_impl_all!(AnalysisResult: Send, Sync);

impl ColumnAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a single column.
    ///
    /// Rows that lack the key are treated as null. The whole row set is
    /// processed; nothing is sampled.
    pub fn analyze(&self, rows: &[Row], column: &str) -> AnalysisResult {
        if !rows.is_empty() && rows.iter().all(|row| row.get(column).is_none()) {
            warn!("Column '{}' is absent from all {} rows", column, rows.len());
        }

        let clean = clean_values(
            rows.iter().map(|row| row.value(column)),
            self.config.exclude_empty_strings,
        );
        let null_count = rows.len() - clean.len();

        if clean.is_empty() {
            debug!("Column '{}' has no values to analyze", column);
            return Self::no_data(column, null_count);
        }

        let counts = frequencies(clean.iter().copied());
        let unique_count = counts.len();
        let bins = self.config.histogram_bins;

        let (statistics, histogram) = match numeric_values(&clean).and_then(|numbers| {
            numeric_summary(&numbers).map(|summary| (summary, numeric_histogram(&numbers, bins)))
        }) {
            Some((summary, histogram)) => (ColumnStatistics::Numeric(summary), histogram),
            None => {
                let mode = mode(&counts)
                    .cloned()
                    .unwrap_or_else(|| Value::from(NO_DATA));
                (
                    ColumnStatistics::Categorical { mode },
                    categorical_histogram(&counts, bins),
                )
            }
        };

        let result = AnalysisResult {
            column_name: column.to_string(),
            count: clean.len(),
            null_count,
            unique_count,
            statistics,
            histogram,
        };

        debug!(
            "Analyzed column '{}': {} ({} values, {} missing, {} buckets)",
            column,
            result.column_type().as_str(),
            result.count,
            result.null_count,
            result.histogram.len()
        );

        result
    }

    /// Analyze every column of the table, in the order of the first row's keys.
    pub fn analyze_table(&self, rows: &[Row]) -> Vec<AnalysisResult> {
        column_names(rows)
            .iter()
            .map(|column| self.analyze(rows, column))
            .collect()
    }

    /// Histogram of arbitrary values using this analyzer's bin count and
    /// missing-value rule.
    pub fn histogram(&self, values: &[Value]) -> Vec<HistogramBin> {
        histogram::build_histogram(
            values,
            self.config.histogram_bins,
            self.config.exclude_empty_strings,
        )
    }

    fn no_data(column: &str, null_count: usize) -> AnalysisResult {
        AnalysisResult {
            column_name: column.to_string(),
            count: 0,
            null_count,
            unique_count: 0,
            statistics: ColumnStatistics::Categorical {
                mode: Value::from(NO_DATA),
            },
            histogram: vec![HistogramBin::no_data()],
        }
    }
}

/// Analyze one column with the default configuration.
///
/// # Example
///
/// ```rust,ignore
/// use datalens::{analyze_column, ColumnType, Row};
///
/// let rows = vec![Row::new().with("x", 1), Row::new().with("x", "a")];
/// let result = analyze_column(&rows, "x");
/// assert_eq!(result.column_type(), ColumnType::Categorical);
/// ```
pub fn analyze_column(rows: &[Row], column: &str) -> AnalysisResult {
    ColumnAnalyzer::default().analyze(rows, column)
}

/// Analyze every column of a table with the default configuration.
pub fn analyze_table(rows: &[Row]) -> Vec<AnalysisResult> {
    ColumnAnalyzer::default().analyze_table(rows)
}
