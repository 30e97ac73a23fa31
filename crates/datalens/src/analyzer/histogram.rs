//! Histogram binning for numeric and categorical columns.

use super::classification::{clean_values, numeric_values};
use super::statistics::{FrequencyEntry, frequencies, min_max};
use crate::config::DEFAULT_HISTOGRAM_BINS;
use crate::types::{HistogramBin, Value};
use crate::utils::fixed2;

/// Bin a raw column into at most `bins` buckets.
///
/// Missing values (null and empty strings) are dropped first. Numeric
/// columns are split into `bins` equal-width intervals over `[min, max]`,
/// in ascending order; a column holding a single distinct number collapses
/// to one bucket. Other columns are counted per distinct value and only the
/// `bins` most frequent values are kept, most frequent first. The long tail
/// beyond that is dropped on purpose.
///
/// Never returns an empty vector: a column without clean values yields one
/// `"No Data"` bucket, and `bins == 0` is treated as `1`.
///
/// # Example
///
/// ```rust,ignore
/// use datalens::{create_histogram, Value};
///
/// let values = vec![Value::from(5), Value::from(5), Value::from(5)];
/// let histogram = create_histogram(&values, 10);
/// assert_eq!(histogram[0].bin, "5.00");
/// assert_eq!(histogram[0].count, 3);
/// ```
pub fn create_histogram(values: &[Value], bins: usize) -> Vec<HistogramBin> {
    build_histogram(values, bins, true)
}

/// [`create_histogram`] with the default of ten buckets.
pub fn create_default_histogram(values: &[Value]) -> Vec<HistogramBin> {
    create_histogram(values, DEFAULT_HISTOGRAM_BINS)
}

pub(crate) fn build_histogram<'a>(
    values: impl IntoIterator<Item = &'a Value>,
    bins: usize,
    exclude_empty: bool,
) -> Vec<HistogramBin> {
    let clean = clean_values(values, exclude_empty);
    if clean.is_empty() {
        return vec![HistogramBin::no_data()];
    }

    match numeric_values(&clean) {
        Some(numbers) => numeric_histogram(&numbers, bins),
        None => categorical_histogram(&frequencies(clean), bins),
    }
}

/// Equal-width buckets over `[min, max]`.
pub(crate) fn numeric_histogram(numbers: &[f64], bins: usize) -> Vec<HistogramBin> {
    if numbers.is_empty() {
        return vec![HistogramBin::no_data()];
    }

    let bins = bins.max(1);
    let (min, max) = min_max(numbers);

    if min == max {
        return vec![HistogramBin::new(fixed2(min), numbers.len())];
    }

    let bin_size = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| {
            let low = min + i as f64 * bin_size;
            let high = min + (i + 1) as f64 * bin_size;
            HistogramBin::new(format!("{} - {}", fixed2(low), fixed2(high)), 0)
        })
        .collect();

    for &n in numbers {
        // The maximum lands exactly on the upper edge; clamp it into the last bucket.
        let index = (((n - min) / bin_size).floor() as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}

/// The `bins` most frequent values, by descending count.
///
/// The sort is stable, so equally frequent values keep first-seen order.
pub(crate) fn categorical_histogram(entries: &[FrequencyEntry<'_>], bins: usize) -> Vec<HistogramBin> {
    if entries.is_empty() {
        return vec![HistogramBin::no_data()];
    }

    let mut ranked: Vec<&FrequencyEntry<'_>> = entries.iter().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    ranked
        .into_iter()
        .take(bins.max(1))
        .map(|entry| HistogramBin::new(entry.key.clone(), entry.count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn total(histogram: &[HistogramBin]) -> usize {
        histogram.iter().map(|b| b.count).sum()
    }

    // ==================== degenerate input tests ====================

    #[test]
    fn test_empty_input_yields_no_data_bin() {
        assert_eq!(create_histogram(&[], 10), vec![HistogramBin::new("No Data", 0)]);
    }

    #[test]
    fn test_all_missing_yields_no_data_bin() {
        let values = vec![Value::Null, Value::from(""), Value::Null];
        assert_eq!(create_histogram(&values, 10), vec![HistogramBin::no_data()]);
    }

    #[test]
    fn test_single_value_collapses_to_one_bin() {
        let values = vec![Value::from(5), Value::from(5), Value::from(5)];
        assert_eq!(create_histogram(&values, 10), vec![HistogramBin::new("5.00", 3)]);
    }

    #[test]
    fn test_zero_bins_treated_as_one() {
        let values = vec![Value::from(1), Value::from(2)];
        let histogram = create_histogram(&values, 0);
        assert_eq!(histogram, vec![HistogramBin::new("1.00 - 2.00", 2)]);

        let values = vec![Value::from("a"), Value::from("b")];
        assert_eq!(create_histogram(&values, 0).len(), 1);
    }

    // ==================== numeric binning tests ====================

    #[test]
    fn test_numeric_labels_and_counts() {
        let values: Vec<Value> = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
            .into_iter()
            .map(Value::from)
            .collect();
        let histogram = create_histogram(&values, 5);

        let labels: Vec<&str> = histogram.iter().map(|b| b.bin.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "0.00 - 2.00",
                "2.00 - 4.00",
                "4.00 - 6.00",
                "6.00 - 8.00",
                "8.00 - 10.00"
            ]
        );
        let counts: Vec<usize> = histogram.iter().map(|b| b.count).collect();
        // 10 is clamped into the last bucket
        assert_eq!(counts, vec![2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_numeric_text_values_are_binned_numerically() {
        let values = vec![Value::from("1"), Value::from("3"), Value::from(" 2 ")];
        let histogram = create_histogram(&values, 2);
        assert_eq!(
            histogram,
            vec![
                HistogramBin::new("1.00 - 2.00", 1),
                HistogramBin::new("2.00 - 3.00", 2),
            ]
        );
    }

    #[test]
    fn test_numeric_histogram_conserves_count() {
        let numbers: Vec<f64> = (0..1000).map(|i| (i as f64).sqrt() * 3.7 - 20.0).collect();
        let histogram = numeric_histogram(&numbers, 10);

        assert_eq!(histogram.len(), 10);
        assert_eq!(total(&histogram), 1000);
    }

    #[test]
    fn test_numeric_histogram_negative_range() {
        let histogram = numeric_histogram(&[-1.0, -0.5, 0.0], 2);
        assert_eq!(histogram[0].bin, "-1.00 - -0.50");
        assert_eq!(histogram[1].bin, "-0.50 - 0.00");
        assert_eq!(total(&histogram), 3);
    }

    // ==================== categorical binning tests ====================

    #[test]
    fn test_categorical_sorted_by_frequency() {
        let values: Vec<Value> = ["a", "b", "b", "c", "c", "c"]
            .into_iter()
            .map(Value::from)
            .collect();
        assert_eq!(
            create_histogram(&values, 10),
            vec![
                HistogramBin::new("c", 3),
                HistogramBin::new("b", 2),
                HistogramBin::new("a", 1),
            ]
        );
    }

    #[test]
    fn test_categorical_ties_keep_first_seen_order() {
        let values: Vec<Value> = ["z", "y", "x", "y", "z", "x"]
            .into_iter()
            .map(Value::from)
            .collect();
        let labels: Vec<String> = create_histogram(&values, 10)
            .into_iter()
            .map(|b| b.bin)
            .collect();
        assert_eq!(labels, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_categorical_truncates_long_tail() {
        let values: Vec<Value> = (0..50).map(|i| Value::from(format!("v{}", i))).collect();
        let histogram = create_histogram(&values, 10);

        assert_eq!(histogram.len(), 10);
        assert_eq!(total(&histogram), 10);
        assert_eq!(histogram[0].bin, "v0");
    }

    #[test]
    fn test_mixed_values_are_categorical() {
        let values = vec![Value::from(1), Value::from("a"), Value::from(1)];
        assert_eq!(
            create_histogram(&values, 10),
            vec![HistogramBin::new("1", 2), HistogramBin::new("a", 1)]
        );
    }

    #[test]
    fn test_empty_strings_kept_when_not_excluded() {
        let values = vec![Value::from(""), Value::from("a"), Value::from("")];
        let histogram = build_histogram(&values, 10, false);
        assert_eq!(histogram[0], HistogramBin::new("", 2));
    }
}
