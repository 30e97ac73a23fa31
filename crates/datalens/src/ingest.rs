//! Table ingestion.
//!
//! CSV files are read through polars and converted into [`Row`]s once, so
//! every cell's variant is fixed at load time: numeric dtypes become
//! [`Value::Number`], everything else [`Value::Text`], and nulls stay
//! [`Value::Null`]. JSON files are read as an array of flat objects.

use crate::error::{AnalysisError, Result, ResultExt};
use crate::types::{Row, Value};
use crate::utils::is_numeric_dtype;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows scanned before polars settles on a column dtype.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a table, choosing the reader from the file extension.
pub fn load_table(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => load_csv(path)?,
        "json" => {
            let file = File::open(path).context(format!("Opening {}", path.display()))?;
            load_json_rows(BufReader::new(file))?
        }
        other => {
            return Err(AnalysisError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                format!(".{other}")
            }));
        }
    };

    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read a CSV file, retrying without quote handling if the first pass fails.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let df = read_csv_with_fallbacks(path.as_ref())?;
    debug!("CSV shape: {:?}", df.shape());
    rows_from_dataframe(&df)
}

fn read_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    let quoted = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Opening {}", path.display()))?
        .finish();

    match quoted {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard CSV loading failed: {}", e),
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .context(format!("Reading {}", path.display()))
}

/// Read CSV text already in memory.
pub fn read_csv_str(content: &str) -> Result<Vec<Row>> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(std::io::Cursor::new(content.as_bytes().to_vec()))
        .finish()?;
    rows_from_dataframe(&df)
}

/// Read a JSON array of objects. Nested values are rejected.
pub fn load_json_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let rows: Vec<Row> = serde_json::from_reader(reader)?;
    Ok(rows)
}

/// Convert a polars frame into rows, column by column.
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<Row>> {
    let mut rows: Vec<Row> = (0..df.height()).map(|_| Row::new()).collect();

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let name = series.name().to_string();

        if is_numeric_dtype(series.dtype()) {
            let floats = series.cast(&DataType::Float64)?;
            for (row, cell) in rows.iter_mut().zip(floats.f64()?.into_iter()) {
                row.set(name.as_str(), Value::from(cell));
            }
        } else {
            let strings = series.cast(&DataType::String)?;
            for (row, cell) in rows.iter_mut().zip(strings.str()?.into_iter()) {
                row.set(name.as_str(), Value::from(cell));
            }
        }
    }

    Ok(rows)
}

/// Build a polars frame from rows for the given columns.
///
/// A column holding only numbers and nulls becomes `Float64`; any text
/// makes the whole column `String`, with numbers in their display form.
pub fn dataframe_from_rows(rows: &[Row], columns: &[String]) -> Result<DataFrame> {
    let mut frame_columns: Vec<Column> = Vec::with_capacity(columns.len());

    for name in columns {
        let cells: Vec<&Value> = rows.iter().map(|row| row.value(name)).collect();
        let numeric = cells
            .iter()
            .all(|cell| matches!(cell, Value::Number(_) | Value::Null));

        let series = if numeric {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| cell.as_number()).collect();
            Series::new(name.as_str().into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| (!cell.is_null()).then(|| cell.to_string()))
                .collect();
            Series::new(name.as_str().into(), values)
        };
        frame_columns.push(series.into());
    }

    Ok(DataFrame::new(frame_columns)?)
}
