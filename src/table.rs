//! Column-major table model for loaded survey data.
//!
//! A [`Table`] stores named, typed columns with a compact validity bitmap
//! for tracking missing entries. The table is built once by the loader
//! and never mutated afterwards; every summarizer takes `&Table`.
//!
//! # Column Types
//!
//! | Type | Storage | Use case |
//! |------|---------|----------|
//! | [`Integer`](Column::Integer) | `Vec<i64>` + bitmap | Whole-number quantities |
//! | [`Float`](Column::Float) | `Vec<f64>` + bitmap | Continuous quantities |
//! | [`Categorical`](Column::Categorical) | Dictionary + `Vec<u32>` | Low-cardinality labels |
//! | [`Text`](Column::Text) | `Vec<String>` + bitmap | High-cardinality strings |
//!
//! Integer and Float columns form the numerical group; Categorical and
//! Text columns form the categorical group (see [`TypeGroup`]).
//!
//! # Example
//!
//! ```
//! use tabsum::table::{Table, Column, ValidityBitmap};
//!
//! let mut table = Table::new();
//! table.add_column(
//!     "age".to_string(),
//!     Column::integer(vec![34, 29, 41], ValidityBitmap::all_valid(3)),
//! ).unwrap();
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.column_count(), 1);
//! ```

use crate::error::SummaryError;
use serde::Serialize;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap over `u64` words.
///
/// Bit `i` is 1 when row `i` holds a value and 0 when it is missing.
/// One bit per row keeps even wide survey files cheap to track.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityBitmap {
    words: Vec<u64>,
    rows: usize,
}

/// Word index and single-bit mask for a row position.
#[inline]
fn locate(idx: usize) -> (usize, u64) {
    (idx / 64, 1u64 << (idx % 64))
}

impl ValidityBitmap {
    /// Creates a bitmap where every one of `rows` positions holds a value.
    pub fn all_valid(rows: usize) -> Self {
        let mut bm = Self::all_missing(rows);
        for word in &mut bm.words {
            *word = u64::MAX;
        }
        if let Some(last) = bm.words.last_mut() {
            let trailing = rows % 64;
            if trailing != 0 {
                *last = (1u64 << trailing) - 1;
            }
        }
        bm
    }

    /// Creates a bitmap where every one of `rows` positions is missing.
    pub fn all_missing(rows: usize) -> Self {
        Self {
            words: vec![0u64; rows.div_ceil(64)],
            rows,
        }
    }

    /// Creates an empty bitmap with no rows.
    pub fn empty() -> Self {
        Self::all_missing(0)
    }

    /// Returns `true` if the entry at `idx` holds a value.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.rows, "row {idx} out of bounds ({})", self.rows);
        let (word, mask) = locate(idx);
        self.words[word] & mask != 0
    }

    /// Marks the entry at `idx` as missing.
    #[inline]
    pub fn set_missing(&mut self, idx: usize) {
        debug_assert!(idx < self.rows, "row {idx} out of bounds ({})", self.rows);
        let (word, mask) = locate(idx);
        self.words[word] &= !mask;
    }

    /// Appends a new position (present or missing).
    pub fn push(&mut self, valid: bool) {
        let (word, mask) = locate(self.rows);
        self.rows += 1;
        if word == self.words.len() {
            self.words.push(0);
        }
        if valid {
            self.words[word] |= mask;
        }
    }

    /// Returns the total number of tracked positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns `true` if the bitmap tracks zero positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Counts the positions that hold a value, via hardware popcount.
    pub fn valid_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Counts the missing positions.
    pub fn missing_count(&self) -> usize {
        self.rows - self.valid_count()
    }

    /// Returns an iterator over indices of non-missing positions.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows).filter(|&idx| self.is_valid(idx))
    }
}

// ── ColumnType ────────────────────────────────────────────────────────

/// Semantic data type inferred for a column at load time.
///
/// The stored type is authoritative: classification and selection
/// validation read it directly, so the loader's inference and the
/// selection lists can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole-number values (stored as `i64`).
    Integer,
    /// Continuous values (stored as `f64`).
    Float,
    /// Low-cardinality labels (dictionary-encoded).
    Categorical,
    /// High-cardinality or free-form text.
    Text,
}

impl ColumnType {
    /// Returns the type group this column type belongs to.
    pub fn group(self) -> TypeGroup {
        match self {
            Self::Integer | Self::Float => TypeGroup::Numerical,
            Self::Categorical | Self::Text => TypeGroup::Categorical,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Categorical => write!(f, "categorical"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// The two selection groups a column can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeGroup {
    /// Label-valued columns: [`ColumnType::Categorical`] and [`ColumnType::Text`].
    Categorical,
    /// Quantity-valued columns: [`ColumnType::Integer`] and [`ColumnType::Float`].
    Numerical,
}

impl std::fmt::Display for TypeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Categorical => write!(f, "categorical"),
            Self::Numerical => write!(f, "numerical"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with a validity bitmap for missing entries.
///
/// All variants store values in a dense array alongside a
/// [`ValidityBitmap`]. Missing positions hold a placeholder (0, 0.0,
/// empty string, or code 0) that must be ignored via the bitmap.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Dense `i64` values. Missing positions hold `0`.
    Integer {
        values: Vec<i64>,
        validity: ValidityBitmap,
    },
    /// Dense `f64` values. Missing positions hold `0.0`.
    Float {
        values: Vec<f64>,
        validity: ValidityBitmap,
    },
    /// Dictionary-encoded label column.
    ///
    /// `dictionary` holds unique labels in first-encountered order;
    /// `codes` maps each row to a dictionary index. Missing positions
    /// have code `0` (ignored via the bitmap).
    Categorical {
        dictionary: Vec<String>,
        codes: Vec<u32>,
        validity: ValidityBitmap,
    },
    /// Free-form text column. Missing positions hold an empty string.
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    /// Creates an integer column.
    pub fn integer(values: Vec<i64>, validity: ValidityBitmap) -> Self {
        Self::Integer { values, validity }
    }

    /// Creates a float column.
    pub fn float(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Float { values, validity }
    }

    /// Creates a categorical column from a dictionary and codes.
    pub fn categorical(dictionary: Vec<String>, codes: Vec<u32>, validity: ValidityBitmap) -> Self {
        Self::Categorical {
            dictionary,
            codes,
            validity,
        }
    }

    /// Creates a text column.
    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        Self::Text { values, validity }
    }

    /// Returns the data type of this column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Integer { .. } => ColumnType::Integer,
            Self::Float { .. } => ColumnType::Float,
            Self::Categorical { .. } => ColumnType::Categorical,
            Self::Text { .. } => ColumnType::Text,
        }
    }

    /// Returns the number of rows in this column.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the validity bitmap.
    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Integer { validity, .. }
            | Self::Float { validity, .. }
            | Self::Categorical { validity, .. }
            | Self::Text { validity, .. } => validity,
        }
    }

    /// Returns the number of missing entries.
    pub fn missing_count(&self) -> usize {
        self.validity().missing_count()
    }

    /// Returns the number of non-missing entries.
    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }

    /// Returns `true` if the entry at `idx` holds a value.
    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Returns the numeric value at `idx` as `f64`, or `None` if the
    /// entry is missing or the column is not numerical.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Integer { values, validity } => {
                validity.is_valid(idx).then(|| values[idx] as f64)
            }
            Self::Float { values, validity } => validity.is_valid(idx).then(|| values[idx]),
            _ => None,
        }
    }

    /// Returns all non-missing values as `f64`, or `None` if the column
    /// is not numerical. Integer values are widened.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Integer { values, validity } => {
                Some(validity.valid_indices().map(|i| values[i] as f64).collect())
            }
            Self::Float { values, validity } => {
                Some(validity.valid_indices().map(|i| values[i]).collect())
            }
            _ => None,
        }
    }

    /// Returns the label at `idx` for a categorical or text column, or
    /// `None` if the entry is missing or the column is numerical.
    pub fn label_at(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Categorical {
                dictionary,
                codes,
                validity,
            } => {
                if !validity.is_valid(idx) {
                    return None;
                }
                dictionary.get(codes[idx] as usize).map(String::as_str)
            }
            Self::Text { values, validity } => {
                validity.is_valid(idx).then(|| values[idx].as_str())
            }
            _ => None,
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────

/// Column-major tabular data structure.
///
/// Stores named, typed columns. All columns have the same row count and
/// column names are unique; both invariants are enforced by
/// [`add_column`](Table::add_column).
///
/// # Example
///
/// ```
/// use tabsum::table::{Table, Column, ValidityBitmap};
///
/// let mut table = Table::new();
/// table.add_column(
///     "weight".to_string(),
///     Column::float(vec![61.2, 74.9, 58.0], ValidityBitmap::all_valid(3)),
/// ).unwrap();
/// table.add_column(
///     "region".to_string(),
///     Column::text(
///         vec!["north".into(), "south".into(), "north".into()],
///         ValidityBitmap::all_valid(3),
///     ),
/// ).unwrap();
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.column_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates an empty table with no columns or rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named column to the table.
    ///
    /// Fails if the name is already taken or the column length does not
    /// match the existing row count (unless this is the first column).
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), SummaryError> {
        if self.names.iter().any(|n| *n == name) {
            return Err(SummaryError::DuplicateColumn { name });
        }
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(SummaryError::LengthMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns column names in table order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns a reference to the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    /// Returns the index of the column with the given `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// Looks up a column by name, requiring it to be in the numerical
    /// group. This is the validating accessor the summarizers use: a bad
    /// name or a wrong type group fails explicitly instead of producing
    /// an undefined result.
    pub fn numerical_column(&self, name: &str) -> Result<&Column, SummaryError> {
        self.grouped_column(name, TypeGroup::Numerical)
    }

    /// Looks up a column by name, requiring it to be in the categorical
    /// group.
    pub fn categorical_column(&self, name: &str) -> Result<&Column, SummaryError> {
        self.grouped_column(name, TypeGroup::Categorical)
    }

    fn grouped_column(&self, name: &str, expected: TypeGroup) -> Result<&Column, SummaryError> {
        let col = self
            .column_by_name(name)
            .ok_or_else(|| SummaryError::ColumnNotFound {
                name: name.to_string(),
            })?;
        let actual = col.column_type();
        if actual.group() != expected {
            return Err(SummaryError::TypeMismatch {
                column: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(col)
    }

    /// Returns an iterator over (name, column) pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| (name.as_str(), col))
    }

    /// Returns the (name, type) schema in table order.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        self.iter()
            .map(|(name, col)| (name, col.column_type()))
            .collect()
    }

    /// Returns the total number of missing entries across all columns.
    pub fn total_missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
