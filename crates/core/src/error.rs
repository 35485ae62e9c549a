//! Error types for the ScopeDesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// Failures reported by the external reasoning service.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures while restricting a dataset to a scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A `grade` cell could not be read as an integer. `row` is 1-based.
    #[error("grade value {value:?} in data row {row} is not an integer")]
    TypeConversion { row: usize, value: String },
}

/// Failures while loading the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read dataset at {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Malformed CSV: {0}")]
    Csv(String),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
}
