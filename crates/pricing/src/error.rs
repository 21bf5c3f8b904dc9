//! Pricing error types.

use thiserror::Error;

/// Errors returned by the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// An input was outside its allowed domain.
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: String },
}

impl PricingError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        PricingError::InvalidInput {
            field,
            value: value.to_string(),
        }
    }

    /// Name of the offending input.
    pub fn field(&self) -> &'static str {
        match self {
            PricingError::InvalidInput { field, .. } => field,
        }
    }
}

/// Result type for pricing operations.
pub type Result<T> = std::result::Result<T, PricingError>;
