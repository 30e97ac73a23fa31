//! Custom error types for the analysis engine.
//!
//! The analysis functions themselves never fail: empty, all-null and
//! mixed-type columns resolve to sentinel results. Errors only arise on the
//! fallible edges of the crate (ingestion, export, configuration and the
//! CLI's argument parsing).
//!
//! Errors are serializable so they can be handed to a frontend for display.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis engine.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A filter expression could not be parsed.
    #[error("Invalid filter '{expression}': {reason}")]
    InvalidFilter { expression: String, reason: String },

    /// A sort expression could not be parsed.
    #[error("Invalid sort '{0}': expected <column>[:asc|desc]")]
    InvalidSort(String),

    /// A row index pointed past the end of the table.
    #[error("Row {index} is out of bounds for a table of {len} rows")]
    RowOutOfBounds { index: usize, len: usize },

    /// The dataset contains no rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Input file has an extension we cannot load.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

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
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidFilter { .. } => "INVALID_FILTER",
            Self::InvalidSort(_) => "INVALID_SORT",
            Self::RowOutOfBounds { .. } => "ROW_OUT_OF_BOUNDS",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is caused by user input the caller can correct
    /// and retry with (as opposed to an IO or decoding failure).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ColumnNotFound(_)
            | Self::InvalidConfig(_)
            | Self::InvalidFilter { .. }
            | Self::InvalidSort(_)
            | Self::RowOutOfBounds { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<crate::config::ConfigValidationError> for AnalysisError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

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
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(AnalysisError::EmptyDataset.error_code(), "EMPTY_DATASET");
        assert_eq!(
            AnalysisError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            AnalysisError::RowOutOfBounds { index: 4, len: 2 }.error_code(),
            "ROW_OUT_OF_BOUNDS"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AnalysisError::InvalidSort("x:up".to_string()).is_recoverable());
        assert!(AnalysisError::ColumnNotFound("x".to_string()).is_recoverable());
        assert!(!AnalysisError::EmptyDataset.is_recoverable());
        assert!(
            !AnalysisError::Io(std::io::Error::other("disk")).is_recoverable()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::ColumnNotFound("test".to_string()).with_context("During export");
        assert!(error.to_string().contains("During export"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_io_result_context() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv"));
        let err = result.context("Loading table").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().starts_with("Loading table"));
    }
}
