//! Dataset loader with automatic per-column type inference.
//!
//! Parses a delimited file into a [`Table`](crate::table::Table) with
//! column types inferred from content. Inference priority:
//! Integer → Float → Categorical → Text. A column is numerical only if
//! every non-missing value parses as a number; anything else lands in a
//! text-like type. Mixed content is a policy outcome, never an error.
//!
//! # Features
//!
//! - RFC 4180 field parsing (quoted fields, escaped quotes, embedded
//!   delimiters and newlines), BOM strip, CRLF and bare-CR line endings
//! - Standard missing-value markers: empty, `NA`, `N/A`, `null`, `NULL`,
//!   `None`, `.`, `NaN`
//! - Low-cardinality strings are dictionary-encoded as Categorical
//! - Configurable delimiter, header handling, and missing markers
//! - Fail-fast contract: a missing file, empty input, or ragged row is
//!   an error and no partial table is returned
//!
//! # Example
//!
//! ```
//! use tabsum::loader::DatasetLoader;
//! use tabsum::table::ColumnType;
//!
//! let csv = "region,current age,weight\nnorth,34,61.2\nsouth,29,74.9\n";
//! let table = DatasetLoader::new().load_str(csv).unwrap();
//! assert_eq!(table.row_count(), 2);
//! let schema = table.schema();
//! assert_eq!(schema[0].1, ColumnType::Text);
//! assert_eq!(schema[1].1, ColumnType::Integer);
//! assert_eq!(schema[2].1, ColumnType::Float);
//! ```

use crate::error::SummaryError;
use crate::table::{Column, ColumnType, Table, ValidityBitmap};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Standard missing-value markers recognized during parsing.
const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", ".", "NaN", "nan", "NAN",
    "#N/A", "#NA",
];

/// Maximum unique-label ratio for a column to be stored as Categorical
/// instead of Text.
const CATEGORICAL_THRESHOLD: f64 = 0.5;

/// Maximum dictionary size for categorical columns.
const MAX_CATEGORICAL_UNIQUE: usize = 1000;

/// Loader configuration and entry point.
///
/// ```
/// use tabsum::loader::DatasetLoader;
///
/// let csv = "a,b\n1,2\n3,4\n";
/// let table = DatasetLoader::new().load_str(csv).unwrap();
/// assert_eq!(table.row_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    delimiter: u8,
    has_header: bool,
    missing_markers: Vec<String>,
}

impl DatasetLoader {
    /// Creates a loader with default settings: comma delimiter, header
    /// row, standard missing markers.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row is a header (default: true). Without a
    /// header, columns are named `col_0`, `col_1`, ...
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Sets custom missing-value markers (replaces the defaults).
    pub fn missing_markers(mut self, markers: Vec<String>) -> Self {
        self.missing_markers = markers;
        self
    }

    /// Loads a delimited file from disk into a [`Table`].
    ///
    /// A missing or unreadable file surfaces as
    /// [`SummaryError::Load`]; malformed content as
    /// [`SummaryError::Parse`]. No partial table is ever returned.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table, SummaryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SummaryError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let table = self.load_str(&content)?;
        debug!(
            "loaded '{}': {} rows, {} columns",
            path.display(),
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    /// Parses delimited text into a [`Table`].
    pub fn load_str(&self, input: &str) -> Result<Table, SummaryError> {
        // Strip BOM if present
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        let raw_rows = self.parse_raw(input);
        if raw_rows.is_empty() {
            return Err(SummaryError::Parse {
                line: 1,
                message: "dataset is empty".to_string(),
            });
        }

        let (headers, data_rows) = if self.has_header {
            let headers: Vec<String> = raw_rows[0].clone();
            (headers, &raw_rows[1..])
        } else {
            let n_cols = raw_rows[0].len();
            let headers: Vec<String> = (0..n_cols).map(|i| format!("col_{i}")).collect();
            (headers, &raw_rows[..])
        };

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(SummaryError::Parse {
                line: 1,
                message: "header row has no column names".to_string(),
            });
        }
        if data_rows.is_empty() {
            return Err(SummaryError::Parse {
                line: 2,
                message: "dataset has a header but no data rows".to_string(),
            });
        }

        let n_cols = headers.len();
        let n_rows = data_rows.len();

        // Transpose to column-major raw strings
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::with_capacity(n_rows); n_cols];
        for (row_idx, row) in data_rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(SummaryError::Parse {
                    line: if self.has_header {
                        row_idx + 2
                    } else {
                        row_idx + 1
                    },
                    message: format!("expected {n_cols} fields, got {}", row.len()),
                });
            }
            for (col_idx, field) in row.iter().enumerate() {
                raw_columns[col_idx].push(field.clone());
            }
        }

        // Infer types and build columns. Header names are used verbatim
        // (spaces included) as selection keys; duplicates are rejected
        // by the table's unique-name invariant.
        let mut table = Table::new();
        for (col_idx, raw_col) in raw_columns.iter().enumerate() {
            let col = self.build_column(raw_col);
            debug!(
                "column '{}' inferred as {}",
                headers[col_idx],
                col.column_type()
            );
            table.add_column(headers[col_idx].clone(), col)?;
        }

        Ok(table)
    }

    // ── Internal parsing ─────────────────────────────────────────

    /// Splits raw delimited text into rows of string fields, honoring
    /// RFC 4180 quoting.
    fn parse_raw(&self, input: &str) -> Vec<Vec<String>> {
        // Leading blank lines are dropped; a later blank line becomes a
        // one-field row and surfaces as a ragged-row error upstream.
        fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
            if rows.is_empty() && row.iter().all(|f| f.is_empty()) {
                row.clear();
            } else {
                rows.push(std::mem::take(row));
            }
        }

        let delim = self.delimiter as char;
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        // Escaped quote ""
                        chars.next();
                        field.push('"');
                    }
                    '"' => in_quotes = false,
                    _ => field.push(c),
                }
                continue;
            }
            match c {
                '"' if field.is_empty() => in_quotes = true,
                _ if c == delim => row.push(std::mem::take(&mut field)),
                '\n' => {
                    // \r\n leaves a trailing \r on the field
                    if field.ends_with('\r') {
                        field.truncate(field.len() - 1);
                    }
                    row.push(std::mem::take(&mut field));
                    end_row(&mut rows, &mut row);
                }
                // Bare \r (old Mac style) acts as a newline
                '\r' if chars.peek() != Some(&'\n') => {
                    row.push(std::mem::take(&mut field));
                    end_row(&mut rows, &mut row);
                }
                '\r' => {}
                _ => field.push(c),
            }
        }

        // Last field/row without a trailing newline
        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }

        // Drop trailing all-empty rows
        while rows.last().is_some_and(|r| r.iter().all(|f| f.is_empty())) {
            rows.pop();
        }

        rows
    }

    /// Checks whether a trimmed field is a missing-value marker.
    fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.missing_markers.iter().any(|m| m == trimmed)
    }

    /// Infers the column type and builds a typed [`Column`].
    fn build_column(&self, raw_values: &[String]) -> Column {
        let trimmed: Vec<&str> = raw_values.iter().map(|s| s.trim()).collect();
        let missing: Vec<bool> = trimmed.iter().map(|s| self.is_missing(s)).collect();

        match self.infer_type(&trimmed, &missing) {
            ColumnType::Integer => build_integer_column(&trimmed, &missing),
            ColumnType::Float => build_float_column(&trimmed, &missing),
            ColumnType::Categorical => build_categorical_column(&trimmed, &missing),
            ColumnType::Text => build_text_column(&trimmed, &missing),
        }
    }

    /// Determines the most specific type that fits all non-missing values.
    fn infer_type(&self, values: &[&str], missing: &[bool]) -> ColumnType {
        let present: Vec<&str> = values
            .iter()
            .zip(missing.iter())
            .filter(|(_, &m)| !m)
            .map(|(&v, _)| v)
            .collect();

        // All missing: vacuously numerical
        if present.is_empty() {
            return ColumnType::Float;
        }

        if present.iter().all(|s| s.parse::<i64>().is_ok()) {
            return ColumnType::Integer;
        }
        if present.iter().all(|s| s.parse::<f64>().is_ok()) {
            return ColumnType::Float;
        }

        // Categorical vs Text: cardinality decides
        let unique: HashSet<&str> = present.iter().copied().collect();
        let ratio = unique.len() as f64 / present.len() as f64;
        if ratio < CATEGORICAL_THRESHOLD && unique.len() <= MAX_CATEGORICAL_UNIQUE {
            ColumnType::Categorical
        } else {
            ColumnType::Text
        }
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

// ── Column builders ───────────────────────────────────────────────────

fn build_integer_column(values: &[&str], missing: &[bool]) -> Column {
    let mut nums = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (i, &val) in values.iter().enumerate() {
        if missing[i] {
            nums.push(0);
            validity.push(false);
        } else {
            nums.push(val.parse::<i64>().unwrap_or(0));
            validity.push(true);
        }
    }

    Column::integer(nums, validity)
}

fn build_float_column(values: &[&str], missing: &[bool]) -> Column {
    let mut nums = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (i, &val) in values.iter().enumerate() {
        if missing[i] {
            nums.push(0.0);
            validity.push(false);
        } else {
            nums.push(val.parse::<f64>().unwrap_or(0.0));
            validity.push(true);
        }
    }

    Column::float(nums, validity)
}

fn build_categorical_column(values: &[&str], missing: &[bool]) -> Column {
    let mut dict_map: HashMap<String, u32> = HashMap::new();
    let mut dictionary: Vec<String> = Vec::new();
    let mut codes = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (i, &val) in values.iter().enumerate() {
        if missing[i] {
            codes.push(0);
            validity.push(false);
        } else {
            let code = if let Some(&existing) = dict_map.get(val) {
                existing
            } else {
                let code = dictionary.len() as u32;
                dictionary.push(val.to_string());
                dict_map.insert(val.to_string(), code);
                code
            };
            codes.push(code);
            validity.push(true);
        }
    }

    Column::categorical(dictionary, codes, validity)
}

fn build_text_column(values: &[&str], missing: &[bool]) -> Column {
    let mut texts = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();

    for (i, &val) in values.iter().enumerate() {
        if missing[i] {
            texts.push(String::new());
            validity.push(false);
        } else {
            texts.push(val.to_string());
            validity.push(true);
        }
    }

    Column::text(texts, validity)
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Basic parsing ────────────────────────────────────────────

    #[test]
    fn load_simple_dataset() {
        let csv = "a,b,c\n1,2,3\n4,5,6\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.column_names(), &["a", "b", "c"]);
    }

    #[test]
    fn integer_column_inference() {
        let csv = "n\n1\n-2\n300\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let n = table.column_by_name("n").unwrap();
        assert_eq!(n.column_type(), ColumnType::Integer);
        assert_eq!(n.valid_numeric_values().unwrap(), vec![1.0, -2.0, 300.0]);
    }

    #[test]
    fn float_column_inference() {
        let csv = "x,y\n1.5,2\n3.1,-4.2\n0,100\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        // A single fractional value makes the whole column Float.
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type(), ColumnType::Float);
        let y = table.column_by_name("y").unwrap();
        assert_eq!(y.column_type(), ColumnType::Float);
        assert_eq!(y.valid_numeric_values().unwrap(), vec![2.0, -4.2, 100.0]);
    }

    #[test]
    fn integer_demotes_to_float_not_text() {
        let csv = "x\n1\n2.5\n3\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(
            table.column_by_name("x").unwrap().column_type(),
            ColumnType::Float
        );
    }

    #[test]
    fn categorical_column_inference() {
        // 3 unique labels / 7 rows = 0.43 < 0.5 → categorical
        let csv = "status\nA\nB\nC\nA\nB\nA\nC\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let status = table.column_by_name("status").unwrap();
        assert_eq!(status.column_type(), ColumnType::Categorical);
        assert_eq!(status.label_at(0), Some("A"));
        assert_eq!(status.label_at(2), Some("C"));
        assert_eq!(status.label_at(5), Some("A"));
    }

    #[test]
    fn text_column_inference() {
        // All labels unique → high cardinality → text
        let csv = "name\nAlice\nBob\nCharlie\nDave\nEve\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let name = table.column_by_name("name").unwrap();
        assert_eq!(name.column_type(), ColumnType::Text);
        assert_eq!(name.label_at(0), Some("Alice"));
    }

    #[test]
    fn mixed_content_is_text_like_not_error() {
        let csv = "x\n1\n2\nthree\n4\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type().group(), crate::table::TypeGroup::Categorical);
    }

    #[test]
    fn header_names_kept_verbatim() {
        let csv = "current age,number of household members (total listed)\n34,5\n29,3\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert!(table.column_by_name("current age").is_some());
        assert!(table
            .column_by_name("number of household members (total listed)")
            .is_some());
    }

    // ── Missing values ───────────────────────────────────────────

    #[test]
    fn missing_markers_recognized() {
        let csv = "x\n1.5\nNA\n3.5\n\n5.5\nnull\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type(), ColumnType::Float);
        assert_eq!(x.missing_count(), 3);
        assert!(x.is_valid(0));
        assert!(!x.is_valid(1));
        assert!(x.is_valid(2));
        assert!(!x.is_valid(3));
        assert!(x.is_valid(4));
        assert!(!x.is_valid(5));
    }

    #[test]
    fn missing_integer_cell_keeps_column_integer() {
        let csv = "n\n1\nna\n3\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let n = table.column_by_name("n").unwrap();
        assert_eq!(n.column_type(), ColumnType::Integer);
        assert_eq!(n.missing_count(), 1);
        assert_eq!(n.valid_numeric_values().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn all_missing_column_defaults_to_float() {
        let csv = "x\nNA\n\nnull\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type(), ColumnType::Float);
        assert_eq!(x.missing_count(), 3);
        assert_eq!(x.valid_count(), 0);
    }

    #[test]
    fn nan_marker_is_missing() {
        let csv = "x\n1.0\nNaN\n3.0\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.missing_count(), 1);
        assert!(!x.is_valid(1));
    }

    #[test]
    fn custom_missing_markers() {
        let csv = "x\n1.0\n-999\n3.0\n";
        let table = DatasetLoader::new()
            .missing_markers(vec!["-999".to_string()])
            .load_str(csv)
            .unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.missing_count(), 1);
        assert!(!x.is_valid(1));
    }

    // ── Quoting and line endings ─────────────────────────────────

    #[test]
    fn quoted_fields() {
        let csv = "name,desc\nAlice,\"hello, world\"\nBob,\"she said \"\"hi\"\"\"\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let desc = table.column_by_name("desc").unwrap();
        assert_eq!(desc.label_at(0), Some("hello, world"));
        assert_eq!(desc.label_at(1), Some("she said \"hi\""));
    }

    #[test]
    fn quoted_embedded_newlines() {
        let csv = "name,note\nAlice,\"line1\nline2\"\nBob,simple\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(table.row_count(), 2);
        let note = table.column_by_name("note").unwrap();
        assert_eq!(note.label_at(0), Some("line1\nline2"));
        assert_eq!(note.label_at(1), Some("simple"));
    }

    #[test]
    fn crlf_line_endings() {
        let csv = "a,b\r\n1,2\r\n3,4\r\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(table.row_count(), 2);
        let a = table.column_by_name("a").unwrap();
        assert_eq!(a.valid_numeric_values().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn no_trailing_newline() {
        let csv = "x\n1\n2\n3";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn bom_stripped() {
        let csv = "\u{feff}x,y\n1,2\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(table.column_names(), &["x", "y"]);
    }

    // ── Fail-fast contract ───────────────────────────────────────

    #[test]
    fn empty_input_is_an_error() {
        let result = DatasetLoader::new().load_str("");
        assert!(matches!(result, Err(SummaryError::Parse { .. })));
    }

    #[test]
    fn header_only_is_an_error() {
        let result = DatasetLoader::new().load_str("a,b,c\n");
        assert!(matches!(result, Err(SummaryError::Parse { line: 2, .. })));
    }

    #[test]
    fn ragged_row_is_an_error() {
        let result = DatasetLoader::new().load_str("a,b\n1,2\n3\n");
        assert!(matches!(result, Err(SummaryError::Parse { line: 3, .. })));
    }

    #[test]
    fn duplicate_header_is_an_error() {
        let result = DatasetLoader::new().load_str("x,x\n1,2\n");
        assert_eq!(
            result.unwrap_err(),
            SummaryError::DuplicateColumn { name: "x".into() }
        );
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = DatasetLoader::new().load("definitely/not/here.csv");
        assert!(matches!(result, Err(SummaryError::Load { .. })));
    }

    // ── Configuration ────────────────────────────────────────────

    #[test]
    fn without_header() {
        let csv = "1,2\n3,4\n";
        let table = DatasetLoader::new().has_header(false).load_str(csv).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), &["col_0", "col_1"]);
    }

    #[test]
    fn tab_delimiter() {
        let csv = "a\tb\n1\t2\n3\t4\n";
        let table = DatasetLoader::new()
            .delimiter(b'\t')
            .load_str(csv)
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), &["a", "b"]);
    }

    #[test]
    fn semicolon_delimiter() {
        let csv = "a;b\n1;2\n3;4\n";
        let table = DatasetLoader::new()
            .delimiter(b';')
            .load_str(csv)
            .unwrap();
        assert_eq!(table.row_count(), 2);
    }

    // ── Inference edge cases ─────────────────────────────────────

    #[test]
    fn numeric_with_surrounding_spaces() {
        let csv = "x\n  1.5  \n  2.3  \n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type(), ColumnType::Float);
        assert_eq!(x.valid_numeric_values().unwrap(), vec![1.5, 2.3]);
    }

    #[test]
    fn scientific_notation_is_float() {
        let csv = "x\n-1.5\n2.3e10\n-4.5E-3\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type(), ColumnType::Float);
        let vals = x.valid_numeric_values().unwrap();
        assert_eq!(vals[0], -1.5);
        assert!((vals[1] - 2.3e10).abs() < 1.0);
        assert!((vals[2] - (-4.5e-3)).abs() < 1e-10);
    }

    #[test]
    fn huge_integers_fall_back_to_float() {
        // Parses as f64 but overflows i64.
        let csv = "x\n1\n92233720368547758080\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(
            table.column_by_name("x").unwrap().column_type(),
            ColumnType::Float
        );
    }

    #[test]
    fn cardinality_threshold_boundary() {
        // 2 unique / 4 rows = 0.5, not < 0.5 → text
        let csv = "x\nA\nB\nA\nB\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(
            table.column_by_name("x").unwrap().column_type(),
            ColumnType::Text
        );

        // 2 unique / 5 rows = 0.4 → categorical
        let csv = "x\nA\nB\nA\nB\nA\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(
            table.column_by_name("x").unwrap().column_type(),
            ColumnType::Categorical
        );
    }

    #[test]
    fn labels_are_case_sensitive() {
        let csv = "x\na\nA\na\nA\na\nA\na\nA\na\nA\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.column_type(), ColumnType::Categorical);
        assert_eq!(x.label_at(0), Some("a"));
        assert_eq!(x.label_at(1), Some("A"));
    }
}
