//! Configuration types for the analysis engine.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic engine setup.

use serde::{Deserialize, Serialize};

/// Default number of histogram buckets.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Default cap on the number of points handed to a chart.
pub const DEFAULT_CHART_MAX_POINTS: usize = 1000;

/// Default number of groups kept in a grouped chart.
pub const DEFAULT_CHART_TOP_GROUPS: usize = 20;

/// Configuration for column analysis and chart preparation.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use datalens::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .histogram_bins(20)
///     .exclude_empty_strings(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum number of histogram buckets per column.
    /// Numeric columns get exactly this many buckets (unless the range is
    /// degenerate); categorical columns keep this many most frequent values.
    /// Default: 10
    pub histogram_bins: usize,

    /// Whether empty strings count as missing values.
    /// When false, only null and absent cells are excluded.
    /// Default: true
    pub exclude_empty_strings: bool,

    /// Tables larger than this are down-sampled before charting.
    /// Default: 1000
    pub chart_max_points: usize,

    /// Number of groups kept (by descending total) in a grouped chart.
    /// Default: 20
    pub chart_top_groups: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            exclude_empty_strings: true,
            chart_max_points: DEFAULT_CHART_MAX_POINTS,
            chart_top_groups: DEFAULT_CHART_TOP_GROUPS,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidBinCount(self.histogram_bins));
        }

        if self.chart_max_points == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "chart_max_points".to_string(),
                value: self.chart_max_points,
            });
        }

        if self.chart_top_groups == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "chart_top_groups".to_string(),
                value: self.chart_top_groups,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid histogram bin count: {0} (must be at least 1)")]
    InvalidBinCount(usize),

    #[error("Invalid limit for '{field}': {value} (must be at least 1)")]
    InvalidLimit { field: String, value: usize },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    histogram_bins: Option<usize>,
    exclude_empty_strings: Option<bool>,
    chart_max_points: Option<usize>,
    chart_top_groups: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the maximum number of histogram buckets.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Choose whether empty strings are treated as missing values.
    pub fn exclude_empty_strings(mut self, exclude: bool) -> Self {
        self.exclude_empty_strings = Some(exclude);
        self
    }

    /// Set the point cap used when preparing chart data.
    pub fn chart_max_points(mut self, max_points: usize) -> Self {
        self.chart_max_points = Some(max_points);
        self
    }

    /// Set how many groups a grouped chart keeps.
    pub fn chart_top_groups(mut self, top: usize) -> Self {
        self.chart_top_groups = Some(top);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let config = AnalysisConfig {
            histogram_bins: self.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
            exclude_empty_strings: self.exclude_empty_strings.unwrap_or(true),
            chart_max_points: self.chart_max_points.unwrap_or(DEFAULT_CHART_MAX_POINTS),
            chart_top_groups: self.chart_top_groups.unwrap_or(DEFAULT_CHART_TOP_GROUPS),
        };

        config.validate()?;
        Ok(config)
    }
}
