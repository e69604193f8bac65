//! Numerical summarization: descriptive statistics and correlation.
//!
//! [`describe`] reports the standard descriptive record for one
//! numerical column; [`correlate`] computes a pairwise Pearson matrix
//! over all numerical columns. Missing values are excluded everywhere.
//! Degenerate data (an all-missing column, zero variance, too few
//! co-present observations) degrades to NaN, never an error: those are
//! ordinary survey-data conditions, not caller mistakes.

use crate::error::SummaryError;
use crate::stats;
use crate::table::{Table, TypeGroup};
use serde::Serialize;

// ── Descriptive statistics ────────────────────────────────────────────

/// Descriptive statistics for one numerical column.
///
/// `std_dev` is the sample standard deviation (Bessel's correction,
/// n − 1); quartiles use R-7 linear interpolation. A column with zero
/// non-missing values has `count == 0` and NaN statistics, which
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Selected column name.
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    pub max: f64,
}

/// Computes descriptive statistics for a numerical column.
///
/// Fails with a selection error if the column does not exist or is not
/// numerical.
///
/// ```
/// use tabsum::loader::DatasetLoader;
/// use tabsum::describe::describe;
///
/// let csv = "age\n10\n20\n30\n40\n50\n";
/// let table = DatasetLoader::new().load_str(csv).unwrap();
/// let d = describe(&table, "age").unwrap();
/// assert_eq!(d.count, 5);
/// assert_eq!(d.mean, 30.0);
/// assert_eq!(d.median, 30.0);
/// ```
pub fn describe(table: &Table, column: &str) -> Result<DescriptiveStats, SummaryError> {
    let col = table.numerical_column(column)?;
    let values = col.valid_numeric_values().expect("numerical column");

    let count = values.len();
    if count == 0 {
        return Ok(DescriptiveStats {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        });
    }

    let sorted = stats::sorted(&values);
    let quantile = |p: f64| -> f64 {
        sorted
            .as_deref()
            .and_then(|s| stats::quantile_sorted(s, p))
            .unwrap_or(f64::NAN)
    };

    Ok(DescriptiveStats {
        column: column.to_string(),
        count,
        mean: stats::mean(&values).unwrap_or(f64::NAN),
        std_dev: stats::sample_std_dev(&values).unwrap_or(f64::NAN),
        min: stats::min(&values).unwrap_or(f64::NAN),
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: stats::max(&values).unwrap_or(f64::NAN),
    })
}

// ── Correlation matrix ────────────────────────────────────────────────

/// Square Pearson correlation matrix over the numerical columns.
///
/// Symmetric by construction; `get(i, j)` and `get(j, i)` are the same
/// cell. The diagonal is `1.0` for columns with nonzero variance over at
/// least two observations, NaN otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    /// Row-major `names.len() × names.len()` coefficients.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Returns the numerical column names, in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the matrix dimension (number of numerical columns).
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Returns the coefficient at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.size() && col < self.size(), "index out of bounds");
        self.values[row * self.size() + col]
    }

    /// Returns the coefficient for a pair of column names, or `None` if
    /// either name is not a numerical column.
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.get(i, j))
    }
}

/// Computes the pairwise Pearson correlation matrix over all numerical
/// columns.
///
/// Missing values are handled by pairwise deletion: each pair of columns
/// is correlated over the rows where both values are present. Pairs with
/// fewer than 2 co-present observations, or zero variance on either
/// side, yield NaN: correlation is a best-effort diagnostic and never
/// fails. A table with no numerical columns yields an empty matrix.
pub fn correlate(table: &Table) -> CorrelationMatrix {
    let numerical: Vec<&str> = table
        .iter()
        .filter(|(_, c)| c.column_type().group() == TypeGroup::Numerical)
        .map(|(name, _)| name)
        .collect();

    let n = numerical.len();
    let mut values = vec![f64::NAN; n * n];

    for i in 0..n {
        let col_i = table.column_by_name(numerical[i]).expect("known column");

        // Diagonal: 1.0 only where the column has spread to correlate.
        let valid = col_i.valid_numeric_values().expect("numerical column");
        let diag = match stats::sample_variance(&valid) {
            Some(var) if var > 0.0 => 1.0,
            _ => f64::NAN,
        };
        values[i * n + i] = diag;

        for j in (i + 1)..n {
            let col_j = table.column_by_name(numerical[j]).expect("known column");

            // Pairwise deletion: keep rows where both sides are present.
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for idx in 0..table.row_count() {
                if let (Some(x), Some(y)) = (col_i.numeric_at(idx), col_j.numeric_at(idx)) {
                    xs.push(x);
                    ys.push(y);
                }
            }

            let r = pearson(&xs, &ys);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    CorrelationMatrix {
        names: numerical.into_iter().map(String::from).collect(),
        values,
    }
}

/// Pearson product-moment coefficient over paired observations.
///
/// NaN for fewer than 2 pairs or zero variance on either side.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let (Some(mx), Some(my)) = (stats::mean(xs), stats::mean(ys)) else {
        return f64::NAN;
    };

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DatasetLoader;

    #[test]
    fn age_scenario() {
        let csv = "age\n10\n20\n30\n40\n50\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let d = describe(&table, "age").unwrap();

        assert_eq!(d.count, 5);
        assert_eq!(d.mean, 30.0);
        assert_eq!(d.min, 10.0);
        assert_eq!(d.max, 50.0);
        assert_eq!(d.median, 30.0);
        assert_eq!(d.q1, 20.0);
        assert_eq!(d.q3, 40.0);
        // Sample std dev of 10..50 step 10 is sqrt(250).
        assert!((d.std_dev - 250.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn quartiles_are_ordered() {
        let csv = "x\n3.5\n1.2\n9.9\n4.4\n2.8\n7.1\n5.0\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let d = describe(&table, "x").unwrap();
        assert!(d.min <= d.q1);
        assert!(d.q1 <= d.median);
        assert!(d.median <= d.q3);
        assert!(d.q3 <= d.max);
    }

    #[test]
    fn missing_values_excluded_from_count_and_stats() {
        let csv = "x\n10\nNA\n20\n\n30\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let d = describe(&table, "x").unwrap();
        assert_eq!(d.count, 3);
        assert_eq!(d.mean, 20.0);
        assert_eq!(d.min, 10.0);
        assert_eq!(d.max, 30.0);
    }

    #[test]
    fn empty_column_reports_nan_not_error() {
        let csv = "x\nNA\nNA\nNA\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let d = describe(&table, "x").unwrap();
        assert_eq!(d.count, 0);
        assert!(d.mean.is_nan());
        assert!(d.std_dev.is_nan());
        assert!(d.min.is_nan());
        assert!(d.median.is_nan());
    }

    #[test]
    fn single_value_has_nan_std_dev() {
        let csv = "x\n42\nNA\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let d = describe(&table, "x").unwrap();
        assert_eq!(d.count, 1);
        assert_eq!(d.mean, 42.0);
        assert_eq!(d.median, 42.0);
        assert!(d.std_dev.is_nan());
    }

    #[test]
    fn selection_errors() {
        let csv = "region,age\nnorth,34\nsouth,29\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert!(matches!(
            describe(&table, "nope"),
            Err(SummaryError::ColumnNotFound { .. })
        ));
        assert!(matches!(
            describe(&table, "region"),
            Err(SummaryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn describe_is_idempotent() {
        let csv = "x\n1\n2\n3\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        assert_eq!(describe(&table, "x").unwrap(), describe(&table, "x").unwrap());
    }

    // ── correlate ────────────────────────────────────────────────

    #[test]
    fn perfect_positive_and_negative_correlation() {
        let csv = "x,y,z\n1,2,5\n2,4,4\n3,6,3\n4,8,2\n5,10,1\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);

        assert_eq!(m.size(), 3);
        assert_eq!(m.names(), &["x", "y", "z"]);
        assert!((m.get_by_name("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get_by_name("x", "z").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let csv = "a,b,c\n1.0,3.2,7.5\n2.5,1.1,6.0\n3.1,4.4,2.2\n4.8,2.0,9.9\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);

        for i in 0..m.size() {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
                let r = m.get(i, j);
                assert!((-1.0..=1.0).contains(&r));
            }
        }
    }

    #[test]
    fn zero_variance_column_yields_nan_cells() {
        let csv = "x,flat\n1,7\n2,7\n3,7\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);

        assert!(m.get_by_name("x", "flat").unwrap().is_nan());
        assert!(m.get_by_name("flat", "flat").unwrap().is_nan());
        assert_eq!(m.get_by_name("x", "x").unwrap(), 1.0);
    }

    #[test]
    fn pairwise_deletion_uses_co_present_rows() {
        // x and y share only rows 1, 3, 4 (0-based) with both present.
        let csv = "x,y\n1,NA\n2,4\nNA,9\n4,8\n5,10\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);
        // Over (2,4), (4,8), (5,10): y = 2x exactly.
        assert!((m.get_by_name("x", "y").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_co_present_observations_yield_nan() {
        let csv = "x,y\n1,NA\n2,4\nNA,9\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);
        assert!(m.get_by_name("x", "y").unwrap().is_nan());
    }

    #[test]
    fn categorical_columns_are_not_in_the_matrix() {
        let csv = "region,age\nnorth,34\nsouth,29\nnorth,41\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);
        assert_eq!(m.size(), 1);
        assert_eq!(m.names(), &["age"]);
        assert!(m.get_by_name("region", "age").is_none());
    }

    #[test]
    fn no_numerical_columns_yield_empty_matrix() {
        let csv = "a,b\nx,p\ny,q\n";
        let table = DatasetLoader::new().load_str(csv).unwrap();
        let m = correlate(&table);
        assert_eq!(m.size(), 0);
    }
}
