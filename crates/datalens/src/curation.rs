//! Column curation and cell editing.
//!
//! Each operation works on a copy of the table and touches a single
//! column. The caller re-runs analysis on the returned rows.

use crate::error::{AnalysisError, Result};
use crate::types::{Row, Value};
use crate::utils::js_number;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A bulk edit applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "value", rename_all = "snake_case")]
pub enum CurationOperation {
    /// Replace null, absent, empty and `NaN` cells with the given value.
    FillMissing(Value),
    /// Replace text that parses as a finite number with that number.
    ConvertToNumber,
    /// Strip surrounding whitespace from text.
    Trim,
    Uppercase,
    Lowercase,
}

impl CurationOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FillMissing(_) => "fill_missing",
            Self::ConvertToNumber => "convert_to_number",
            Self::Trim => "trim",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
        }
    }

    /// The replacement for `cell`, or `None` if the cell is left alone.
    fn apply(&self, cell: Option<&Value>) -> Option<Value> {
        match (self, cell) {
            (Self::FillMissing(fill), None) => Some(fill.clone()),
            (Self::FillMissing(fill), Some(value)) if is_blank(value) => Some(fill.clone()),
            (Self::ConvertToNumber, Some(Value::Text(s))) if !s.trim().is_empty() => {
                Some(js_number(s)).filter(|n| n.is_finite()).map(Value::Number)
            }
            (Self::Trim, Some(Value::Text(s))) => Some(Value::Text(s.trim().to_string())),
            (Self::Uppercase, Some(Value::Text(s))) => Some(Value::Text(s.to_uppercase())),
            (Self::Lowercase, Some(Value::Text(s))) => Some(Value::Text(s.to_lowercase())),
            _ => None,
        }
    }
}

/// Cells the curation panel reports as missing.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::Number(n) => n.is_nan(),
    }
}

/// Apply `operation` to `column`, returning the new rows and the number of
/// cells that changed.
pub fn curate(rows: &[Row], column: &str, operation: &CurationOperation) -> (Vec<Row>, usize) {
    let mut changed = 0;
    let curated = rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(replacement) = operation.apply(row.get(column))
                && row.get(column) != Some(&replacement)
            {
                row.set(column, replacement);
                changed += 1;
            }
            row
        })
        .collect();

    debug!(
        "Curation '{}' on column '{}' changed {} cells",
        operation.name(),
        column,
        changed
    );
    (curated, changed)
}

/// Replace one cell, as the table editor does on save.
pub fn set_cell(rows: &[Row], index: usize, column: &str, value: impl Into<Value>) -> Result<Vec<Row>> {
    if index >= rows.len() {
        return Err(AnalysisError::RowOutOfBounds {
            index,
            len: rows.len(),
        });
    }

    let mut edited = rows.to_vec();
    edited[index].set(column, value);
    Ok(edited)
}

/// Quick health summary of a column shown next to the curation controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHealth {
    /// Null, absent, empty and `NaN` cells.
    pub missing_count: usize,
    /// Distinct non-null values; a number and its text form count separately.
    pub unique_count: usize,
    /// Whether every non-null value coerces to a number.
    pub is_numeric: bool,
    /// Mean over the values that coerce to a number.
    pub mean: Option<f64>,
}

pub fn column_health(rows: &[Row], column: &str) -> ColumnHealth {
    let missing_count = rows
        .iter()
        .filter(|row| is_blank(row.value(column)))
        .count();

    let present: Vec<&Value> = rows
        .iter()
        .map(|row| row.value(column))
        .filter(|v| !v.is_null())
        .collect();

    let unique_count = present
        .iter()
        .map(|v| (matches!(v, Value::Number(_)), v.to_string()))
        .collect::<HashSet<_>>()
        .len();

    let numbers: Vec<f64> = present
        .iter()
        .map(|v| v.coerce_number())
        .filter(|n| !n.is_nan())
        .collect();

    ColumnHealth {
        missing_count,
        unique_count,
        is_numeric: numbers.len() == present.len(),
        mean: (!numbers.is_empty()).then(|| crate::analyzer::mean(&numbers)),
    }
}
