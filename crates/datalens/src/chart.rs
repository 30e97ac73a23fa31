//! Chart series preparation.
//!
//! Turns a row set into `{name, value}` points for a bar or line chart.
//! Large tables are down-sampled by a fixed stride; grouped charts sum the
//! y column per group and keep the largest groups.

use crate::config::AnalysisConfig;
use crate::types::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Every `ceil(n / max_points)`-th row, starting with the first.
///
/// Tables at or under the limit are returned whole. A limit of zero is
/// treated as one.
pub fn sample_rows(rows: &[Row], max_points: usize) -> Vec<&Row> {
    let max_points = max_points.max(1);
    if rows.len() <= max_points {
        return rows.iter().collect();
    }

    let stride = rows.len().div_ceil(max_points);
    rows.iter().step_by(stride).collect()
}

/// Build chart points for `y` against `x`.
///
/// Without `group_by`, each sampled row becomes one point named by its `x`
/// cell. With `group_by`, the `y` values are summed per distinct group cell
/// and the `chart_top_groups` largest sums are returned, largest first.
/// A `y` cell that does not convert to a number contributes zero.
pub fn prepare_chart_data(
    rows: &[Row],
    x: &str,
    y: &str,
    group_by: Option<&str>,
    config: &AnalysisConfig,
) -> Vec<ChartPoint> {
    let sampled = sample_rows(rows, config.chart_max_points);
    debug!(
        "Sampled {} of {} rows for chart '{}' vs '{}'",
        sampled.len(),
        rows.len(),
        y,
        x
    );

    match group_by {
        None => sampled
            .iter()
            .map(|row| ChartPoint::new(cell_label(row, x), chart_value(row, y)))
            .collect(),
        Some(group) => group_sums(&sampled, group, y, config.chart_top_groups),
    }
}

fn group_sums(rows: &[&Row], group: &str, y: &str, top: usize) -> Vec<ChartPoint> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut points: Vec<ChartPoint> = Vec::new();

    for row in rows {
        let name = cell_label(row, group);
        let value = chart_value(row, y);
        match index.get(&name) {
            Some(&i) => points[i].value += value,
            None => {
                index.insert(name.clone(), points.len());
                points.push(ChartPoint::new(name, value));
            }
        }
    }

    points.sort_by(|a, b| b.value.total_cmp(&a.value));
    points.truncate(top);
    points
}

/// Absent cells are labelled `undefined`, explicit nulls `null`.
fn cell_label(row: &Row, column: &str) -> String {
    row.get(column)
        .map_or_else(|| "undefined".to_string(), ToString::to_string)
}

fn chart_value(row: &Row, column: &str) -> f64 {
    match row.get(column) {
        Some(value) => {
            let n = value.coerce_number();
            if n.is_nan() { 0.0 } else { n }
        }
        None => 0.0,
    }
}
