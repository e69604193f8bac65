//! Column classification and dataset overview.
//!
//! [`classify`] partitions a table's columns into the two selection
//! groups a presentation layer offers: categorical (label-valued) and
//! numerical (quantity-valued). The partition reads the types stored on
//! the columns at load time, so it can never disagree with the loader's
//! inference. Columns whose content was mixed or ambiguous were already
//! inferred as text-like by the loader and therefore land in the
//! categorical group; a policy choice, not an error.

use crate::table::{Table, TypeGroup};
use serde::Serialize;

/// Column names partitioned by selection group, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroups {
    /// Label-valued columns (categorical and text types).
    pub categorical: Vec<String>,
    /// Quantity-valued columns (integer and float types).
    pub numerical: Vec<String>,
}

/// Partitions the table's columns into categorical and numerical groups.
///
/// Pure and deterministic: the same table always yields the same groups,
/// and each group preserves table column order.
///
/// ```
/// use tabsum::loader::DatasetLoader;
/// use tabsum::classify::classify;
///
/// let csv = "region,age\nnorth,34\nsouth,29\nnorth,41\n";
/// let table = DatasetLoader::new().load_str(csv).unwrap();
/// let groups = classify(&table);
/// assert_eq!(groups.categorical, vec!["region"]);
/// assert_eq!(groups.numerical, vec!["age"]);
/// ```
pub fn classify(table: &Table) -> ColumnGroups {
    let mut categorical = Vec::new();
    let mut numerical = Vec::new();

    for (name, column) in table.iter() {
        match column.column_type().group() {
            TypeGroup::Categorical => categorical.push(name.to_string()),
            TypeGroup::Numerical => numerical.push(name.to_string()),
        }
    }

    ColumnGroups {
        categorical,
        numerical,
    }
}

// ── Dataset overview ──────────────────────────────────────────────────

/// Count of columns per data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TypeCounts {
    pub integer: usize,
    pub float: usize,
    pub categorical: usize,
    pub text: usize,
}

impl TypeCounts {
    /// Total number of counted columns.
    pub fn total(&self) -> usize {
        self.integer + self.float + self.categorical + self.text
    }
}

/// Dataset-level summary: dimensions, type mix, and missingness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Columns counted by data type.
    pub type_counts: TypeCounts,
    /// Total missing cells across all columns.
    pub missing_cells: usize,
    /// Missing cells as a percentage of all cells (0–100).
    pub missing_pct: f64,
}

/// Summarizes the whole dataset at a glance.
///
/// ```
/// use tabsum::loader::DatasetLoader;
/// use tabsum::classify::overview;
///
/// let csv = "x,region\n1.5,north\nNA,south\n3.5,north\n";
/// let table = DatasetLoader::new().load_str(csv).unwrap();
/// let ov = overview(&table);
/// assert_eq!(ov.row_count, 3);
/// assert_eq!(ov.missing_cells, 1);
/// ```
pub fn overview(table: &Table) -> DatasetOverview {
    let mut type_counts = TypeCounts::default();
    for (_, column) in table.iter() {
        match column.column_type() {
            crate::table::ColumnType::Integer => type_counts.integer += 1,
            crate::table::ColumnType::Float => type_counts.float += 1,
            crate::table::ColumnType::Categorical => type_counts.categorical += 1,
            crate::table::ColumnType::Text => type_counts.text += 1,
        }
    }

    let row_count = table.row_count();
    let column_count = table.column_count();
    let missing_cells = table.total_missing_count();
    let total_cells = row_count * column_count;
    let missing_pct = if total_cells > 0 {
        (missing_cells as f64 / total_cells as f64) * 100.0
    } else {
        0.0
    };

    DatasetOverview {
        row_count,
        column_count,
        type_counts,
        missing_cells,
        missing_pct,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
