//! Table and analysis exports.

use crate::error::Result;
use crate::ingest::dataframe_from_rows;
use crate::types::{AnalysisResult, ColumnStatistics, Row};
use crate::utils::fixed2;
use polars::prelude::*;
use std::io::Write;

/// Separator between column blocks in a text report.
const BLOCK_SEPARATOR: &str = "\n---\n\n";

/// Write `columns` of `rows` as CSV with a header line.
pub fn write_rows_csv<W: Write>(rows: &[Row], columns: &[String], writer: W) -> Result<()> {
    let mut df = dataframe_from_rows(rows, columns)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array of objects.
pub fn write_rows_json<W: Write>(rows: &[Row], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Plain-text summary of analysis results, one block per column.
///
/// Numeric statistics are printed with two decimals.
pub fn analysis_text_report(results: &[AnalysisResult]) -> String {
    results
        .iter()
        .map(text_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn text_block(result: &AnalysisResult) -> String {
    let mut block = format!(
        "Column: {}\nType: {}\nCount: {}",
        result.column_name,
        result.column_type().as_str(),
        result.count
    );

    match &result.statistics {
        ColumnStatistics::Numeric(summary) => {
            let lines = [
                ("Mean", summary.mean),
                ("Median", summary.median),
                ("Min", summary.min),
                ("Max", summary.max),
                ("Standard Deviation", summary.standard_deviation),
                ("Q1", summary.quartiles.q1),
                ("Q3", summary.quartiles.q3),
            ];
            for (label, value) in lines {
                block.push_str(&format!("\n{}: {}", label, fixed2(value)));
            }
        }
        ColumnStatistics::Categorical { mode } => {
            block.push_str(&format!("\nMode: {}", mode));
        }
    }

    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_column;
    use crate::types::Value;
    use pretty_assertions::assert_eq;

    fn table() -> Vec<Row> {
        vec![
            Row::new().with("n", 1).with("s", "a"),
            Row::new().with("n", 2).with("s", "b"),
            Row::new().with("n", 4).with("s", "a"),
        ]
    }

    #[test]
    fn test_text_report_layout() {
        let rows = table();
        let report = analysis_text_report(&[analyze_column(&rows, "n"), analyze_column(&rows, "s")]);

        let expected = "Column: n\nType: numeric\nCount: 3\n\
                        Mean: 2.33\nMedian: 2.00\nMin: 1.00\nMax: 4.00\n\
                        Standard Deviation: 1.25\nQ1: 1.00\nQ3: 4.00\n\
                        \n---\n\n\
                        Column: s\nType: categorical\nCount: 3\nMode: a\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_text_report_empty() {
        assert_eq!(analysis_text_report(&[]), "");
    }

    #[test]
    fn test_write_rows_csv() {
        let rows = vec![
            Row::new().with("name", "Alice").with("city", Value::Null),
            Row::new().with("name", "Bob, Jr.").with("city", "Oslo"),
        ];
        let mut buffer = Vec::new();
        write_rows_csv(&rows, &["name".to_string(), "city".to_string()], &mut buffer).unwrap();

        let csv = String::from_utf8(buffer).unwrap();
        assert_eq!(csv, "name,city\nAlice,\n\"Bob, Jr.\",Oslo\n");
    }

    #[test]
    fn test_write_rows_json() {
        let rows = vec![Row::new().with("a", 1).with("b", "x")];
        let mut buffer = Vec::new();
        write_rows_json(&rows, &mut buffer).unwrap();

        let parsed: Vec<Row> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, rows);
    }
}
