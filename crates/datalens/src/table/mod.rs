//! Whole-table utilities: filtering, sorting and correlation.
//!
//! These are independent pure transforms over a row set. A table view is
//! built by filtering first and then sorting the survivors, see
//! [`apply_view`].

mod correlation;
mod filter;
mod sort;

pub use correlation::calculate_correlation;
pub use filter::{filter_rows, matches};
pub use sort::{CellOrdering, compare_cells, sort_rows};

use crate::types::{Filter, Row, Sort};
use tracing::debug;

/// Filter, then sort.
pub fn apply_view(rows: &[Row], filters: &[Filter], sort: Option<&Sort>) -> Vec<Row> {
    let filtered = filter_rows(rows, filters);
    debug!(
        "Filtered {} rows down to {} with {} filter(s)",
        rows.len(),
        filtered.len(),
        filters.len()
    );
    sort_rows(&filtered, sort)
}
