//! Statistical functions for column analysis.

use crate::types::{NumericSummary, Quartiles, Value};
use std::collections::HashMap;

/// Occurrence count of one distinct value, keyed by its string form.
#[derive(Debug, Clone)]
pub(crate) struct FrequencyEntry<'a> {
    pub key: String,
    /// First value seen with this key.
    pub first: &'a Value,
    pub count: usize,
}

/// Count values by string form, in order of first occurrence.
pub(crate) fn frequencies<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<FrequencyEntry<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry<'a>> = Vec::new();

    for value in values {
        let key = value.to_string();
        match index.get(&key) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push(FrequencyEntry {
                    key,
                    first: value,
                    count: 1,
                });
            }
        }
    }

    entries
}

/// Most frequent value. The best entry is only replaced on a strictly
/// greater count, so the first-seen value wins ties.
pub(crate) fn mode<'a>(entries: &[FrequencyEntry<'a>]) -> Option<&'a Value> {
    let mut best: Option<(&'a Value, usize)> = None;
    for entry in entries {
        match best {
            Some((_, best_count)) if entry.count <= best_count => {}
            _ => best = Some((entry.first, entry.count)),
        }
    }
    best.map(|(value, _)| value)
}

pub(crate) fn mean(numbers: &[f64]) -> f64 {
    numbers.iter().sum::<f64>() / numbers.len() as f64
}

/// Population standard deviation around `mean`.
pub(crate) fn population_std(numbers: &[f64], mean: f64) -> f64 {
    let variance = numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / numbers.len() as f64;
    variance.sqrt()
}

/// Element at `floor(len * fraction)` of an ascending slice.
fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    let index = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

pub(crate) fn min_max(numbers: &[f64]) -> (f64, f64) {
    numbers
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &n| {
            (lo.min(n), hi.max(n))
        })
}

/// Summary statistics of a non-empty numeric column, `None` when empty.
pub(crate) fn numeric_summary(numbers: &[f64]) -> Option<NumericSummary> {
    if numbers.is_empty() {
        return None;
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(numbers);
    let (min, max) = min_max(numbers);

    Some(NumericSummary {
        mean,
        median: nearest_rank(&sorted, 0.5),
        min,
        max,
        standard_deviation: population_std(numbers, mean),
        quartiles: Quartiles {
            q1: nearest_rank(&sorted, 0.25),
            q3: nearest_rank(&sorted, 0.75),
        },
    })
}
