//! Fetch error types

use thiserror::Error;

use crate::metrics::TableError;

/// Message shown for every failure other than an HTTP status error
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Errors that can occur while fetching engagement metrics
#[derive(Error, Debug)]
pub enum FetchError {
    /// API answered with a non-2xx status
    #[error("API error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout")]
    Timeout,

    /// Connection could not be established
    #[error("Engagement API unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body was not a usable engagement report
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Message shown to the operator
    pub fn user_message(&self) -> String {
        match self {
            FetchError::HttpStatus { status, .. } => format!("Failed to fetch data: {}", status),
            _ => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    /// Status code, when the API answered with an error status
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a transport error the way the rest of the crate reports it
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}

impl From<TableError> for FetchError {
    fn from(err: TableError) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::WeekLabel;

    #[test]
    fn test_user_message() {
        let err = FetchError::HttpStatus {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.user_message(), "Failed to fetch data: 503");
        assert_eq!(err.status(), Some(503));

        assert_eq!(FetchError::Timeout.user_message(), UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(
            FetchError::MalformedResponse("eof".into()).user_message(),
            UNEXPECTED_ERROR_MESSAGE
        );
        assert_eq!(FetchError::Timeout.status(), None);
    }

    #[test]
    fn test_table_error_conversion() {
        let err: FetchError = TableError::DuplicateWeek(WeekLabel::from("2024-01-01")).into();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert_eq!(
            err.to_string(),
            "Malformed response: Duplicate week label: 2024-01-01"
        );
    }
}
