//! Dataset report CLI.
//!
//! Stands in for the presentation layer: loads the dataset named on the
//! command line, then prints either a whole-dataset report (overview,
//! column groups, correlation matrix) or a single-column summary
//! (frequency table for categorical columns; descriptive statistics,
//! histogram, and boxplot for numerical ones), as text or JSON.

use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

use tabsum::classify::{classify, overview};
use tabsum::describe::{correlate, describe};
use tabsum::distribution::{boxplot_summary, histogram, DEFAULT_BIN_COUNT};
use tabsum::error::SummaryError;
use tabsum::frequency::frequency_table;
use tabsum::loader::DatasetLoader;
use tabsum::table::{Table, TypeGroup};

#[derive(Debug, Parser)]
#[command(name = "tabsum", version, about = "Summarize a delimited survey dataset")]
struct Args {
    /// Path to the delimited dataset file.
    path: PathBuf,

    /// Summarize a single column instead of the whole dataset.
    #[arg(long)]
    column: Option<String>,

    /// Histogram bin count for numerical column summaries.
    #[arg(long, default_value_t = DEFAULT_BIN_COUNT)]
    bins: usize,

    /// Field delimiter (single ASCII character).
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SummaryError> {
    let table = DatasetLoader::new()
        .delimiter(args.delimiter as u8)
        .load(&args.path)?;

    match &args.column {
        Some(column) => column_report(&table, column, args.bins, args.json),
        None => dataset_report(&table, args.json),
    }
}

/// Whole-dataset report: overview, column groups, correlation matrix.
fn dataset_report(table: &Table, as_json: bool) -> Result<(), SummaryError> {
    let ov = overview(table);
    let groups = classify(table);
    let corr = correlate(table);

    if as_json {
        let doc = json!({
            "overview": &ov,
            "groups": &groups,
            "correlation": &corr,
        });
        println!("{}", serde_json::to_string_pretty(&doc).expect("valid json"));
        return Ok(());
    }

    println!(
        "{} rows x {} columns ({} missing cells, {:.2}%)",
        ov.row_count, ov.column_count, ov.missing_cells, ov.missing_pct
    );
    println!(
        "types: {} integer, {} float, {} categorical, {} text",
        ov.type_counts.integer, ov.type_counts.float, ov.type_counts.categorical,
        ov.type_counts.text
    );

    println!("\ncategorical columns:");
    for name in &groups.categorical {
        println!("  {name}");
    }
    println!("numerical columns:");
    for name in &groups.numerical {
        println!("  {name}");
    }

    if corr.size() > 1 {
        println!("\ncorrelation matrix (Pearson):");
        for (i, row_name) in corr.names().iter().enumerate() {
            let cells: Vec<String> = (0..corr.size())
                .map(|j| format!("{:>6.2}", corr.get(i, j)))
                .collect();
            println!("  {:<24} {}", truncate(row_name, 24), cells.join(" "));
        }
    }

    Ok(())
}

/// Single-column report, shaped by the column's type group.
fn column_report(
    table: &Table,
    column: &str,
    bins: usize,
    as_json: bool,
) -> Result<(), SummaryError> {
    let col = table
        .column_by_name(column)
        .ok_or_else(|| SummaryError::ColumnNotFound {
            name: column.to_string(),
        })?;

    match col.column_type().group() {
        TypeGroup::Categorical => {
            let freq = frequency_table(table, column)?;
            if as_json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&freq).expect("valid json")
                );
                return Ok(());
            }
            println!("'{column}': {} non-missing values", freq.total);
            for entry in &freq.entries {
                println!(
                    "  {:<24} {:>8} {:>7.2}%",
                    truncate(&entry.label, 24),
                    entry.count,
                    entry.percentage
                );
            }
        }
        TypeGroup::Numerical => {
            let stats = describe(table, column)?;
            let hist = histogram(table, column, bins)?;
            let boxplot = boxplot_summary(table, column)?;
            if as_json {
                let doc = json!({
                    "describe": &stats,
                    "histogram": &hist,
                    "boxplot": &boxplot,
                });
                println!("{}", serde_json::to_string_pretty(&doc).expect("valid json"));
                return Ok(());
            }
            println!("'{column}': {} non-missing values", stats.count);
            println!("  mean    {:>12.4}", stats.mean);
            println!("  std     {:>12.4}", stats.std_dev);
            println!("  min     {:>12.4}", stats.min);
            println!("  q1      {:>12.4}", stats.q1);
            println!("  median  {:>12.4}", stats.median);
            println!("  q3      {:>12.4}", stats.q3);
            println!("  max     {:>12.4}", stats.max);

            if !hist.bins.is_empty() {
                println!("\nhistogram ({} bins):", hist.bins.len());
                let peak = hist.bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);
                for bin in &hist.bins {
                    let bar = "#".repeat(bin.count * 40 / peak);
                    println!(
                        "  [{:>10.3}, {:>10.3}] {:>6} {bar}",
                        bin.lower, bin.upper, bin.count
                    );
                }
            }

            if !boxplot.outliers.is_empty() {
                let shown: Vec<String> = boxplot
                    .outliers
                    .iter()
                    .take(10)
                    .map(|v| format!("{v}"))
                    .collect();
                let suffix = if boxplot.outliers.len() > 10 {
                    format!(" (+{} more)", boxplot.outliers.len() - 10)
                } else {
                    String::new()
                };
                println!("\noutliers: {}{suffix}", shown.join(", "));
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
