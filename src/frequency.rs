//! Categorical summarization: frequency tables and cross-tabulation.
//!
//! Labels are compared by exact equality, case-sensitive and
//! whitespace-preserving. Missing values are excluded from counts and
//! from the percentage denominator, and never appear as a category.
//!
//! # Example
//!
//! ```
//! use tabsum::loader::DatasetLoader;
//! use tabsum::frequency::frequency_table;
//!
//! let csv = "region\nA\nA\nB\nC\nA\n";
//! let table = DatasetLoader::new().load_str(csv).unwrap();
//! let freq = frequency_table(&table, "region").unwrap();
//!
//! assert_eq!(freq.entries[0].label, "A");
//! assert_eq!(freq.entries[0].count, 3);
//! assert_eq!(freq.entries[0].percentage, 60.0);
//! ```

use crate::error::SummaryError;
use crate::table::{Column, Table};
use serde::Serialize;
use std::collections::HashMap;

/// One category in a [`FrequencyTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    /// Category label, exactly as stored.
    pub label: String,
    /// Number of non-missing occurrences.
    pub count: usize,
    /// Share of non-missing values, in percent, rounded to 2 decimals.
    pub percentage: f64,
}

/// Frequency table for one categorical column.
///
/// Entries are ordered by descending count; ties keep the order in which
/// the labels were first encountered in the data. Percentages sum to
/// ~100 over all entries (up to rounding).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    /// Selected column name.
    pub column: String,
    /// Total non-missing values (the percentage denominator).
    pub total: usize,
    /// Categories, most frequent first.
    pub entries: Vec<FrequencyEntry>,
}

/// Tabulates value frequencies and percentages for a categorical column.
///
/// Fails with a selection error if the column does not exist or is
/// numerical. A column whose values are all missing yields an empty
/// table, not an error.
pub fn frequency_table(table: &Table, column: &str) -> Result<FrequencyTable, SummaryError> {
    let col = table.categorical_column(column)?;
    let (labels, counts) = label_counts(col);

    let total: usize = counts.iter().sum();
    let mut entries: Vec<FrequencyEntry> = labels
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(label, count)| FrequencyEntry {
            label,
            count,
            percentage: round2(count as f64 / total as f64 * 100.0),
        })
        .collect();

    // Stable sort: ties keep first-encountered order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(FrequencyTable {
        column: column.to_string(),
        total,
        entries,
    })
}

/// Counts occurrences per label, labels in first-encountered order.
fn label_counts(col: &Column) -> (Vec<String>, Vec<usize>) {
    match col {
        Column::Categorical {
            dictionary,
            codes,
            validity,
        } => {
            // Dictionary order is first-encountered order by construction.
            let mut counts = vec![0usize; dictionary.len()];
            for idx in validity.valid_indices() {
                counts[codes[idx] as usize] += 1;
            }
            (dictionary.clone(), counts)
        }
        _ => {
            let mut order: Vec<String> = Vec::new();
            let mut index: HashMap<String, usize> = HashMap::new();
            let mut counts: Vec<usize> = Vec::new();
            for idx in 0..col.len() {
                if let Some(label) = col.label_at(idx) {
                    if let Some(&i) = index.get(label) {
                        counts[i] += 1;
                    } else {
                        index.insert(label.to_string(), order.len());
                        order.push(label.to_string());
                        counts.push(1);
                    }
                }
            }
            (order, counts)
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ── Cross-tabulation ──────────────────────────────────────────────────

/// Cross-tabulation of two categorical columns.
///
/// `counts` is a row-major grid: `counts[i][j]` is the number of rows
/// where both labels are present and equal `row_labels[i]` /
/// `col_labels[j]`. `row_percentages` expresses each cell as a share of
/// its row total, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    /// Column providing the row labels.
    pub rows_column: String,
    /// Column providing the column labels.
    pub cols_column: String,
    /// Row labels in first-encountered order.
    pub row_labels: Vec<String>,
    /// Column labels in first-encountered order.
    pub col_labels: Vec<String>,
    /// Co-occurrence counts, row-major.
    pub counts: Vec<Vec<usize>>,
    /// Each cell as a percentage of its row total.
    pub row_percentages: Vec<Vec<f64>>,
}

/// Cross-tabulates two categorical columns over rows where both values
/// are present.
pub fn crosstab(table: &Table, rows: &str, cols: &str) -> Result<CrossTab, SummaryError> {
    let row_col = table.categorical_column(rows)?;
    let col_col = table.categorical_column(cols)?;

    let mut row_labels: Vec<String> = Vec::new();
    let mut col_labels: Vec<String> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut col_index: HashMap<String, usize> = HashMap::new();
    let mut cells: HashMap<(usize, usize), usize> = HashMap::new();

    for idx in 0..table.row_count() {
        let (Some(r), Some(c)) = (row_col.label_at(idx), col_col.label_at(idx)) else {
            continue;
        };
        let ri = *row_index.entry(r.to_string()).or_insert_with(|| {
            row_labels.push(r.to_string());
            row_labels.len() - 1
        });
        let ci = *col_index.entry(c.to_string()).or_insert_with(|| {
            col_labels.push(c.to_string());
            col_labels.len() - 1
        });
        *cells.entry((ri, ci)).or_insert(0) += 1;
    }

    let mut counts = vec![vec![0usize; col_labels.len()]; row_labels.len()];
    for ((ri, ci), n) in cells {
        counts[ri][ci] = n;
    }

    let row_percentages = counts
        .iter()
        .map(|row| {
            let row_total: usize = row.iter().sum();
            row.iter()
                .map(|&n| {
                    if row_total > 0 {
                        round2(n as f64 / row_total as f64 * 100.0)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    Ok(CrossTab {
        rows_column: rows.to_string(),
        cols_column: cols.to_string(),
        row_labels,
        col_labels,
        counts,
        row_percentages,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────
