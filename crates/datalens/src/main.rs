//! CLI entry point for the data exploration engine.

use anyhow::{Result, anyhow};
use clap::Parser;
use datalens::ingest::load_table;
use datalens::reporting::{
    AnalysisReport, ReportGenerator, ReportParams, analysis_text_report, write_rows_csv,
    write_rows_json,
};
use datalens::{
    AnalysisConfig, AnalysisError, AnalysisResult, ColumnAnalyzer, Filter, Row, Sort, apply_view,
    column_names, prepare_chart_data,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Column analysis and histograms for CSV and JSON tables",
    long_about = "Loads a table, applies an optional filtered and sorted view, and \
                  summarizes each column with statistics and a histogram.\n\n\
                  EXAMPLES:\n  \
                  # Analyze every column\n  \
                  datalens -i sales.csv\n\n  \
                  # Two columns, rows with revenue over 100, sorted by date\n  \
                  datalens -i sales.csv -c revenue -c region -f revenue:gt:100 -s date:desc\n\n  \
                  # Correlate two columns and print the full report as JSON\n  \
                  datalens -i sales.csv --correlate units,revenue --json"
)]
struct Args {
    /// Path to the CSV or JSON file to analyze
    #[arg(short, long)]
    input: String,

    /// Column to analyze (repeatable; default: every column)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// Maximum number of histogram buckets
    #[arg(short, long, default_value_t = datalens::config::DEFAULT_HISTOGRAM_BINS)]
    bins: usize,

    /// Count empty strings as values instead of missing
    #[arg(long)]
    keep_empty_strings: bool,

    /// Row filter as column:operator[:value[:value2]] (repeatable, AND-combined)
    ///
    /// Operators: equals, contains, greater, less, between, starts_with,
    /// ends_with, is_null, is_not_null
    #[arg(short, long = "filter")]
    filters: Vec<String>,

    /// Sort the view as column[:asc|desc]
    #[arg(short, long)]
    sort: Option<String>,

    /// Correlate two columns given as x,y (repeatable)
    #[arg(long = "correlate")]
    correlations: Vec<String>,

    /// Print chart points for x:y[:group]
    #[arg(long)]
    chart: Option<String>,

    /// Write the filtered and sorted rows to a CSV file
    #[arg(long)]
    export_csv: Option<String>,

    /// Write the filtered and sorted rows to a JSON file
    #[arg(long)]
    export_json: Option<String>,

    /// Write the plain-text analysis summary to a file
    #[arg(long)]
    export_text: Option<String>,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_analysis.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Output the report as JSON to stdout (disables logging)
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = AnalysisConfig::builder()
        .histogram_bins(args.bins)
        .exclude_empty_strings(!args.keep_empty_strings)
        .build()?;

    let filters = args
        .filters
        .iter()
        .map(|expr| expr.parse::<Filter>())
        .collect::<Result<Vec<_>, _>>()?;
    let sort = args.sort.as_deref().map(str::parse::<Sort>).transpose()?;
    let correlation_pairs = args
        .correlations
        .iter()
        .map(|pair| parse_pair(pair))
        .collect::<Result<Vec<_>>>()?;

    info!("Loading table from: {}", args.input);
    let table = load_table(&args.input)?;
    if table.is_empty() {
        return Err(AnalysisError::EmptyDataset.into());
    }

    let columns = resolve_columns(&table, &args.columns)?;

    let view = apply_view(&table, &filters, sort.as_ref());
    info!("View has {} of {} rows", view.len(), table.len());

    let analyzer = ColumnAnalyzer::new(config.clone());
    let results: Vec<AnalysisResult> = columns
        .iter()
        .map(|column| analyzer.analyze(&view, column))
        .collect();

    let report = ReportGenerator::build_report(ReportParams {
        source: &args.input,
        table: &table,
        view: &view,
        filters: &filters,
        sort: sort.as_ref(),
        columns: &results,
        correlation_pairs: &correlation_pairs,
    });

    write_exports(&args, &view, &table, &results)?;

    if args.emit_report {
        let generator = ReportGenerator::new(args.output.clone().into());
        generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !args.quiet {
        print_human_readable_summary(&report);
        if let Some(spec) = args.chart.as_deref() {
            print_chart(&view, spec, &config)?;
        }
    }

    Ok(())
}

/// Requested columns, or every column of the first row when none are given.
fn resolve_columns(table: &[Row], requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(column_names(table));
    }

    for column in requested {
        if table.iter().all(|row| row.get(column).is_none()) {
            return Err(AnalysisError::ColumnNotFound(column.clone()).into());
        }
    }
    Ok(requested.to_vec())
}

fn parse_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once(',') {
        Some((x, y)) if !x.trim().is_empty() && !y.trim().is_empty() => {
            Ok((x.trim().to_string(), y.trim().to_string()))
        }
        _ => Err(anyhow!("Invalid column pair '{}': expected x,y", pair)),
    }
}

fn write_exports(args: &Args, view: &[Row], table: &[Row], results: &[AnalysisResult]) -> Result<()> {
    if let Some(ref path) = args.export_csv {
        let file = BufWriter::new(File::create(path)?);
        write_rows_csv(view, &column_names(table), file)?;
        info!("Rows exported: {}", path);
    }

    if let Some(ref path) = args.export_json {
        let file = BufWriter::new(File::create(path)?);
        write_rows_json(view, file)?;
        info!("Rows exported: {}", path);
    }

    if let Some(ref path) = args.export_text {
        std::fs::write(path, analysis_text_report(results))?;
        info!("Analysis summary exported: {}", path);
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

/// Print a human-readable summary of the analysis.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_human_readable_summary(report: &AnalysisReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS SUMMARY");
    println!("{}", "=".repeat(80));
    println!();
    println!(
        "Input: {} ({} rows x {} columns, {} rows in view)",
        report.source, report.total_rows, report.column_count, report.row_count
    );
    for filter in &report.filters {
        println!("  filter: {} {:?} {}", filter.column, filter.operator, filter.value);
    }
    if let Some(ref sort) = report.sort {
        println!("  sort:   {} {:?}", sort.column, sort.direction);
    }

    for result in &report.columns {
        println!();
        println!("{}", "-".repeat(80));
        println!(
            "{} [{}] count={} missing={} unique={}",
            result.column_name,
            result.column_type().as_str(),
            result.count,
            result.null_count,
            result.unique_count
        );

        if let Some(stats) = result.numeric() {
            println!(
                "  mean={:.2} median={:.2} std={:.2} min={:.2} max={:.2} q1={:.2} q3={:.2}",
                stats.mean,
                stats.median,
                stats.standard_deviation,
                stats.min,
                stats.max,
                stats.quartiles.q1,
                stats.quartiles.q3
            );
        }
        if let Some(mode) = result.mode() {
            println!("  mode={}", mode);
        }

        let widest = result.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for bucket in &result.histogram {
            let bar = if widest == 0 {
                0
            } else {
                bucket.count * 40 / widest
            };
            println!(
                "  {:<24} {:>7} {}",
                truncate_str(&bucket.bin, 24),
                bucket.count,
                "#".repeat(bar)
            );
        }
    }

    if !report.correlations.is_empty() {
        println!();
        println!("{}", "-".repeat(80));
        println!("CORRELATIONS");
        for entry in &report.correlations {
            println!("  {} ~ {}: {}", entry.x, entry.y, entry.correlation);
        }
    }

    println!("{}", "=".repeat(80));
}

fn print_chart(view: &[Row], spec: &str, config: &AnalysisConfig) -> Result<()> {
    let mut parts = spec.splitn(3, ':');
    let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
        return Err(anyhow!("Invalid chart '{}': expected x:y[:group]", spec));
    };
    let group = parts.next();
    debug!("Preparing chart {} vs {} (group: {:?})", y, x, group);

    let points = prepare_chart_data(view, x, y, group, config);
    if points.is_empty() {
        warn!("Chart '{}' has no points", spec);
    }

    println!();
    println!("CHART {} by {}", y, group.unwrap_or(x));
    for point in points {
        println!("  {:<24} {:>12.2}", truncate_str(&point.name, 24), point.value);
    }
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
