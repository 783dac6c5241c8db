//! Date range validation errors
//!
//! The `Display` text of each variant is the message shown to the operator.

use thiserror::Error;

/// Errors raised when the selected date range cannot be fetched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Start or end date was left empty
    #[error("Please select both a start and end date.")]
    MissingDate,

    /// A date is not in `YYYY-MM-DD` form
    #[error("Invalid date '{0}': expected YYYY-MM-DD.")]
    InvalidDate(String),

    /// Start date is later than end date
    #[error("Start date cannot be after end date.")]
    StartAfterEnd,
}

/// Result type alias for date validation
pub type ValidationResult<T> = Result<T, ValidationError>;
