//! Column type classification.

use crate::types::{ColumnType, Value};

/// Drop missing values, keeping row order.
pub(crate) fn clean_values<'a>(
    values: impl IntoIterator<Item = &'a Value>,
    exclude_empty: bool,
) -> Vec<&'a Value> {
    values
        .into_iter()
        .filter(|v| !v.is_missing(exclude_empty))
        .collect()
}

/// Coerce every clean value to a finite number, or `None` if any one fails.
pub(crate) fn numeric_values(clean: &[&Value]) -> Option<Vec<f64>> {
    clean.iter().map(|v| v.finite_number()).collect()
}

/// The all-or-nothing typing policy.
///
/// A column is numeric only when every clean value converts to a finite
/// number. A single non-numeric value, even among thousands of numbers,
/// makes the whole column categorical. A column without clean values is
/// categorical.
pub fn strict_column_typing(clean: &[&Value]) -> ColumnType {
    match numeric_values(clean) {
        Some(numbers) if !numbers.is_empty() => ColumnType::Numeric,
        _ => ColumnType::Categorical,
    }
}
