//! Suggestion error types.

use thiserror::Error;

/// Errors from the completion service.
///
/// Callers of [`crate::Suggester`] never see these: failures are logged and
/// replaced with fallback suggestions.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Missing or placeholder configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The completion could not be read as the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for suggestion operations.
pub type Result<T> = std::result::Result<T, SuggestError>;
