//! Pearson correlation between two columns.

use crate::types::{Correlation, Row};

/// Pearson correlation of columns `x` and `y`.
///
/// Only cells that already hold finite numbers are used: numeric-looking
/// text is not coerced, and `NaN` or infinite cells are dropped like text.
/// Each column is filtered on its own and the two sequences are paired by
/// position, so they must end up the same length.
///
/// Returns [`Correlation::InsufficientData`] when the sequences are empty or
/// differ in length and [`Correlation::ZeroVariance`] when either column is
/// constant.
pub fn calculate_correlation(rows: &[Row], x: &str, y: &str) -> Correlation {
    let xs = numeric_column(rows, x);
    let ys = numeric_column(rows, y);

    if xs.len() != ys.len() || xs.is_empty() {
        return Correlation::InsufficientData;
    }

    pearson(&xs, &ys)
}

fn numeric_column(rows: &[Row], column: &str) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.value(column).as_number())
        .filter(|n| n.is_finite())
        .collect()
}

/// Pearson coefficient of two equal-length, non-empty sequences.
fn pearson(xs: &[f64], ys: &[f64]) -> Correlation {
    let mean_x = crate::analyzer::mean(xs);
    let mean_y = crate::analyzer::mean(ys);

    let (mut numerator, mut denom_x, mut denom_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    let denominator = (denom_x * denom_y).sqrt();
    if denominator == 0.0 {
        Correlation::ZeroVariance
    } else {
        Correlation::Coefficient(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn pairs(values: &[(Value, Value)]) -> Vec<Row> {
        values
            .iter()
            .map(|(x, y)| Row::new().with("x", x.clone()).with("y", y.clone()))
            .collect()
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let rows: Vec<Row> = (1..=10)
            .map(|i| Row::new().with("x", i).with("y", 2 * i))
            .collect();
        let r = calculate_correlation(&rows, "x", "y").coefficient().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let rows: Vec<Row> = (1..=5)
            .map(|i| Row::new().with("x", i).with("y", 100 - 3 * i))
            .collect();
        let r = calculate_correlation(&rows, "x", "y").coefficient().unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_zero_variance() {
        let rows: Vec<Row> = (1..=5)
            .map(|i| Row::new().with("x", i).with("y", 7))
            .collect();
        assert_eq!(
            calculate_correlation(&rows, "x", "y"),
            Correlation::ZeroVariance
        );
    }

    #[test]
    fn test_empty_is_insufficient() {
        assert_eq!(
            calculate_correlation(&[], "x", "y"),
            Correlation::InsufficientData
        );
    }

    #[test]
    fn test_mismatched_lengths_are_insufficient() {
        let rows = pairs(&[
            (Value::from(1), Value::from(2)),
            (Value::from(2), Value::Null),
            (Value::from(3), Value::from(6)),
        ]);
        assert_eq!(
            calculate_correlation(&rows, "x", "y"),
            Correlation::InsufficientData
        );
    }

    #[test]
    fn test_numeric_text_is_ignored() {
        let rows = pairs(&[
            (Value::from("1"), Value::from("2")),
            (Value::from("2"), Value::from("4")),
        ]);
        assert_eq!(
            calculate_correlation(&rows, "x", "y"),
            Correlation::InsufficientData
        );
    }

    #[test]
    fn test_non_finite_cells_are_dropped() {
        let rows = pairs(&[
            (Value::from(1), Value::from(3)),
            (Value::from(f64::NAN), Value::from(f64::INFINITY)),
            (Value::from(2), Value::from(5)),
            (Value::from(3), Value::from(7)),
        ]);
        let r = calculate_correlation(&rows, "x", "y").coefficient().unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        // Dropping on one side only leaves the sequences mismatched
        let rows = pairs(&[
            (Value::from(1), Value::from(3)),
            (Value::from(f64::NEG_INFINITY), Value::from(4)),
            (Value::from(2), Value::from(5)),
        ]);
        assert_eq!(
            calculate_correlation(&rows, "x", "y"),
            Correlation::InsufficientData
        );
    }

    #[test]
    fn test_sequences_pair_by_position_after_filtering() {
        // Each column drops one (different) row; the rest pair up positionally
        let rows = pairs(&[
            (Value::from(1), Value::Null),
            (Value::from(2), Value::from(10)),
            (Value::Null, Value::from(20)),
        ]);
        let r = calculate_correlation(&rows, "x", "y").coefficient().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }
}
