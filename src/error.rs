//! Error types for tabsum.

use crate::table::{ColumnType, TypeGroup};
use thiserror::Error;

/// All errors produced by tabsum operations.
///
/// Loading errors are fatal: the caller gets no partial table. Selection
/// and configuration errors are recoverable: the presentation layer can
/// re-prompt without reloading the dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    /// Dataset file could not be read.
    #[error("failed to load dataset '{path}': {message}")]
    Load { path: String, message: String },
    /// Dataset content is structurally malformed.
    #[error("malformed dataset at line {line}: {message}")]
    Parse { line: usize, message: String },
    /// Two columns share the same header name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },
    /// Column lengths disagree.
    #[error("expected {expected} rows, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Selected column does not exist in the table.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },
    /// Selected column belongs to the wrong type group for the operation.
    #[error("column '{column}' is {actual}, expected a {expected} column")]
    TypeMismatch {
        column: String,
        expected: TypeGroup,
        actual: ColumnType,
    },
    /// Histogram bin count outside the valid range.
    #[error("bin count must be at least 1, got {requested}")]
    InvalidBinCount { requested: usize },
}

impl SummaryError {
    /// Returns `true` for errors the presentation layer can recover from
    /// by re-prompting (bad selection or parameter), `false` for loading
    /// failures that abort startup.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Load { .. }
                | Self::Parse { .. }
                | Self::DuplicateColumn { .. }
                | Self::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_are_fatal() {
        let err = SummaryError::Load {
            path: "missing.csv".into(),
            message: "no such file".into(),
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn selection_errors_are_recoverable() {
        let err = SummaryError::ColumnNotFound {
            name: "region".into(),
        };
        assert!(err.is_recoverable());

        let err = SummaryError::InvalidBinCount { requested: 0 };
        assert!(err.is_recoverable());
    }

    #[test]
    fn type_mismatch_names_both_sides() {
        let err = SummaryError::TypeMismatch {
            column: "age".into(),
            expected: TypeGroup::Categorical,
            actual: ColumnType::Integer,
        };
        let msg = err.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("integer"));
        assert!(msg.contains("categorical"));
    }
}
