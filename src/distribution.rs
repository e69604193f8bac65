//! Distribution binning: histograms and boxplot summaries.
//!
//! [`histogram`] buckets a numerical column into uniform-width bins over
//! `[min, max]` of its non-missing values; [`boxplot_summary`] reports
//! the five-number summary with Tukey-fence outliers. Both are pure
//! functions of `(&Table, column, parameters)`.
//!
//! # Example
//!
//! ```
//! use tabsum::loader::DatasetLoader;
//! use tabsum::distribution::{histogram, DEFAULT_BIN_COUNT};
//!
//! let csv = "age\n10\n20\n30\n40\n50\n";
//! let table = DatasetLoader::new().load_str(csv).unwrap();
//! let h = histogram(&table, "age", DEFAULT_BIN_COUNT).unwrap();
//! assert_eq!(h.bins.len(), 20);
//! let total: usize = h.bins.iter().map(|b| b.count).sum();
//! assert_eq!(total, 5);
//! ```

use crate::error::SummaryError;
use crate::stats;
use crate::table::Table;
use serde::Serialize;

/// Default number of histogram bins.
pub const DEFAULT_BIN_COUNT: usize = 20;

// ── Histogram ─────────────────────────────────────────────────────────

/// One histogram bin: `[lower, upper)` except the last bin, which
/// includes its upper bound so the maximum value is counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of a numerical column's non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBins {
    /// Selected column name.
    pub column: String,
    /// Uniform bin width; NaN when the column has no values, 0.0 when
    /// it is constant (single bin).
    pub bin_width: f64,
    /// Bins in ascending order. Counts sum to the non-missing count.
    pub bins: Vec<HistogramBin>,
}

/// Bins a numerical column into `bin_count` uniform-width intervals.
///
/// Fails with a selection error for a bad column and a config error for
/// `bin_count == 0`. A constant column (`min == max`) yields a single
/// bin holding every value; the degenerate width is special-cased
/// rather than dividing by zero. A column with no non-missing values
/// yields zero bins.
pub fn histogram(
    table: &Table,
    column: &str,
    bin_count: usize,
) -> Result<HistogramBins, SummaryError> {
    if bin_count == 0 {
        return Err(SummaryError::InvalidBinCount {
            requested: bin_count,
        });
    }

    let col = table.numerical_column(column)?;
    let values = col.valid_numeric_values().expect("numerical column");

    if values.is_empty() {
        return Ok(HistogramBins {
            column: column.to_string(),
            bin_width: f64::NAN,
            bins: Vec::new(),
        });
    }

    let min = stats::min(&values).unwrap_or(f64::NAN);
    let max = stats::max(&values).unwrap_or(f64::NAN);

    if min == max {
        // Zero spread: one bin holds everything.
        return Ok(HistogramBins {
            column: column.to_string(),
            bin_width: 0.0,
            bins: vec![HistogramBin {
                lower: min,
                upper: max,
                count: values.len(),
            }],
        });
    }

    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    for &v in &values {
        let mut idx = ((v - min) / width) as usize;
        // The maximum value lands exactly on the last edge.
        if idx >= bin_count {
            idx = bin_count - 1;
        }
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bin_count {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect();

    Ok(HistogramBins {
        column: column.to_string(),
        bin_width: width,
        bins,
    })
}

// ── Boxplot summary ───────────────────────────────────────────────────

/// Five-number summary with IQR outlier fencing for one numerical
/// column.
///
/// Outliers are the values outside `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`,
/// listed in row order; they stay included in the other statistics. A
/// column with zero non-missing values has NaN statistics and no
/// outliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotSummary {
    /// Selected column name.
    pub column: String,
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    pub max: f64,
    /// Values beyond the Tukey fences, in row order.
    pub outliers: Vec<f64>,
}

/// Computes the boxplot five-number summary and outliers for a
/// numerical column.
///
/// Quartiles use R-7 linear interpolation between order statistics.
pub fn boxplot_summary(table: &Table, column: &str) -> Result<BoxplotSummary, SummaryError> {
    let col = table.numerical_column(column)?;
    let values = col.valid_numeric_values().expect("numerical column");

    if values.is_empty() {
        return Ok(BoxplotSummary {
            column: column.to_string(),
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
            outliers: Vec::new(),
        });
    }

    let sorted = stats::sorted(&values);
    let quantile = |p: f64| -> f64 {
        sorted
            .as_deref()
            .and_then(|s| stats::quantile_sorted(s, p))
            .unwrap_or(f64::NAN)
    };

    let q1 = quantile(0.25);
    let q3 = quantile(0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let outliers = if iqr.is_nan() {
        Vec::new()
    } else {
        values
            .iter()
            .copied()
            .filter(|&v| v < lower_fence || v > upper_fence)
            .collect()
    };

    Ok(BoxplotSummary {
        column: column.to_string(),
        min: stats::min(&values).unwrap_or(f64::NAN),
        q1,
        median: quantile(0.5),
        q3,
        max: stats::max(&values).unwrap_or(f64::NAN),
        outliers,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────
