use thiserror::Error;

use crate::types::ColumnName;

/// Error type for input validation, binning, and configuration failures.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("input table is empty")]
    EmptyTable,
    #[error("required column '{column}' is missing from row {row}")]
    MissingColumn { column: ColumnName, row: usize },
    #[error("column '{column}' holds a non-numeric value at row {row}")]
    NonNumericValue { column: ColumnName, row: usize },
    #[error("lead-time value {value} at row {row} is outside the bucketable range")]
    OutOfRange { value: f64, row: usize },
    #[error("configuration error: {0}")]
    Configuration(String),
}
