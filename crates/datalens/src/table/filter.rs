//! Row filtering.

use crate::types::{Filter, FilterOperator, Row, Value};
use crate::utils::js_number;

/// Rows matching every filter (logical AND). An empty filter list keeps all rows.
///
/// A row whose cell is null or absent never matches, except for the
/// `is_null` / `is_not_null` operators which exist to test exactly that.
pub fn filter_rows(rows: &[Row], filters: &[Filter]) -> Vec<Row> {
    rows.iter()
        .filter(|row| filters.iter().all(|filter| matches(row, filter)))
        .cloned()
        .collect()
}

/// Evaluate one filter against one row.
pub fn matches(row: &Row, filter: &Filter) -> bool {
    let cell = row.value(&filter.column);

    match filter.operator {
        FilterOperator::IsNull => return cell.is_null(),
        FilterOperator::IsNotNull => return !cell.is_null(),
        _ => {}
    }

    if cell.is_null() {
        return false;
    }

    match filter.operator {
        FilterOperator::Equals => cell.to_string() == filter.value,
        FilterOperator::Contains => lowercase(cell).contains(&filter.value.to_lowercase()),
        FilterOperator::StartsWith => lowercase(cell).starts_with(&filter.value.to_lowercase()),
        FilterOperator::EndsWith => lowercase(cell).ends_with(&filter.value.to_lowercase()),
        // NaN on either side compares false
        FilterOperator::Greater => cell.coerce_number() > js_number(&filter.value),
        FilterOperator::Less => cell.coerce_number() < js_number(&filter.value),
        FilterOperator::Between => {
            let n = cell.coerce_number();
            let high = filter.value2.as_deref().map_or(f64::NAN, js_number);
            n >= js_number(&filter.value) && n <= high
        }
        FilterOperator::IsNull | FilterOperator::IsNotNull | FilterOperator::Unknown => true,
    }
}

fn lowercase(value: &Value) -> String {
    value.to_string().to_lowercase()
}
