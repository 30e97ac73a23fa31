//! Row sorting.

use crate::types::{Row, Sort, SortDirection, Value};
use crate::utils::locale_compare;
use std::cmp::Ordering;

/// How the non-null cells of a sort column are compared.
///
/// Chosen once per sort so that every pair of cells is compared the same
/// way, which keeps the comparison a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrdering {
    /// Every non-null cell is a number.
    Numeric,
    /// At least one non-null cell is text; all cells compare as strings.
    Text,
}

impl CellOrdering {
    pub fn for_column(rows: &[Row], column: &str) -> Self {
        let all_numbers = rows
            .iter()
            .map(|row| row.value(column))
            .all(|cell| matches!(cell, Value::Number(_) | Value::Null));
        if all_numbers { Self::Numeric } else { Self::Text }
    }
}

/// Rows ordered by a single column, as a new vector.
///
/// With no sort key the rows are returned in their original order. Null and
/// absent cells always sink to the end, whatever the direction. A column of
/// numbers compares numerically; as soon as it holds any text, every cell
/// compares as text. The sort is stable.
pub fn sort_rows(rows: &[Row], sort: Option<&Sort>) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if let Some(sort) = sort {
        let ordering = CellOrdering::for_column(rows, &sort.column);
        sorted.sort_by(|a, b| {
            compare_cells(
                a.value(&sort.column),
                b.value(&sort.column),
                ordering,
                sort.direction,
            )
        });
    }
    sorted
}

/// Ordering of two cells under `direction`, with nulls last.
pub fn compare_cells(a: &Value, b: &Value, ordering: CellOrdering, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (Value::Null, Value::Null) => return Ordering::Equal,
        (Value::Null, _) => return Ordering::Greater,
        (_, Value::Null) => return Ordering::Less,
        (Value::Number(x), Value::Number(y)) if ordering == CellOrdering::Numeric => x.total_cmp(y),
        _ => locale_compare(&a.to_string(), &b.to_string()),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn xs(rows: &[Row]) -> Vec<Value> {
        rows.iter().map(|r| r.value("x").clone()).collect()
    }

    fn table() -> Vec<Row> {
        vec![
            Row::new().with("x", 3),
            Row::new().with("x", Value::Null),
            Row::new().with("x", 10),
            Row::new().with("y", 1),
            Row::new().with("x", 1),
        ]
    }

    #[test]
    fn test_no_sort_keeps_order() {
        assert_eq!(sort_rows(&table(), None), table());
    }

    #[test]
    fn test_numeric_ascending() {
        let rows = sort_rows(&table(), Some(&Sort::asc("x")));
        assert_eq!(
            xs(&rows),
            vec![
                Value::from(1),
                Value::from(3),
                Value::from(10),
                Value::Null,
                Value::Null
            ]
        );
    }

    #[test]
    fn test_nulls_last_when_descending() {
        let rows = sort_rows(&table(), Some(&Sort::desc("x")));
        assert_eq!(
            xs(&rows),
            vec![
                Value::from(10),
                Value::from(3),
                Value::from(1),
                Value::Null,
                Value::Null
            ]
        );
        // Stable: the explicit null row stays ahead of the absent-key row
        assert!(rows[3].get("x").is_some());
        assert!(rows[4].get("x").is_none());
    }

    #[test]
    fn test_text_compares_as_strings() {
        let rows: Vec<Row> = ["pear", "Apple", "banana", "apple"]
            .into_iter()
            .map(|s| Row::new().with("x", s))
            .collect();
        let sorted = sort_rows(&rows, Some(&Sort::asc("x")));
        assert_eq!(
            xs(&sorted),
            vec![
                Value::from("apple"),
                Value::from("Apple"),
                Value::from("banana"),
                Value::from("pear")
            ]
        );
    }

    #[test]
    fn test_numeric_text_is_not_compared_numerically() {
        let rows = vec![Row::new().with("x", "10"), Row::new().with("x", "9")];
        let sorted = sort_rows(&rows, Some(&Sort::asc("x")));
        assert_eq!(xs(&sorted), vec![Value::from("10"), Value::from("9")]);
    }

    #[test]
    fn test_mixed_number_and_text_fall_back_to_strings() {
        let rows = vec![Row::new().with("x", "b"), Row::new().with("x", 2)];
        let sorted = sort_rows(&rows, Some(&Sort::desc("x")));
        assert_eq!(xs(&sorted), vec![Value::from("b"), Value::from(2)]);
    }

    #[test]
    fn test_mixed_column_compares_numbers_as_text() {
        let rows = vec![
            Row::new().with("x", 10),
            Row::new().with("x", "1a"),
            Row::new().with("x", 2),
        ];
        let sorted = sort_rows(&rows, Some(&Sort::asc("x")));
        assert_eq!(
            xs(&sorted),
            vec![Value::from(10), Value::from("1a"), Value::from(2)]
        );
    }

    #[test]
    fn test_large_mixed_column_sorts_in_both_directions() {
        let rows: Vec<Row> = (0..2000u32)
            .map(|i| {
                let n = (i * 7919 + 13) % 1009;
                let cell = match i % 5 {
                    0 => Value::from(format!("{}a", n)),
                    1 => Value::Null,
                    2 => Value::from(f64::NAN),
                    _ => Value::from(f64::from(n)),
                };
                Row::new().with("x", cell)
            })
            .collect();

        for sort in [Sort::asc("x"), Sort::desc("x")] {
            let sorted = sort_rows(&rows, Some(&sort));
            assert_eq!(sorted.len(), rows.len());
            assert!(sorted.windows(2).all(|pair| {
                compare_cells(
                    pair[0].value("x"),
                    pair[1].value("x"),
                    CellOrdering::Text,
                    sort.direction,
                ) != Ordering::Greater
            }));
            assert!(sorted[1600..].iter().all(|row| row.value("x").is_null()));
        }
    }

    #[test]
    fn test_nan_sorts_consistently_in_numeric_column() {
        let rows: Vec<Row> = [3.0, f64::NAN, 1.0, 2.0]
            .into_iter()
            .map(|n| Row::new().with("x", n))
            .collect();
        let sorted = sort_rows(&rows, Some(&Sort::asc("x")));
        let values: Vec<f64> = sorted.iter().filter_map(|r| r.value("x").as_number()).collect();

        assert_eq!(&values[..3], &[1.0, 2.0, 3.0]);
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let rows = table();
        let _ = sort_rows(&rows, Some(&Sort::asc("x")));
        assert_eq!(rows, table());
    }
}
