//! Input validation for account and profile fields.

use thiserror::Error;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Invalid email format.
    #[error("Invalid email: {0}")]
    InvalidEmail(&'static str),
    /// Password shorter than the minimum.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// Value too long.
    #[error("{field} is too long ({actual} chars, max {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Empty value where one is required.
    #[error("{0} is required")]
    Empty(&'static str),
    /// Numeric value outside its range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted for hashing.
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Allowed relevance threshold range.
pub const THRESHOLD_RANGE: (i64, i64) = (0, 10);

/// Validate an email address.
///
/// Checks for a single `@`, a non-empty local part, and a dotted domain
/// that neither starts nor ends with a dot.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Empty("email"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail("must contain an @ symbol"));
    };
    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail("must contain exactly one @ symbol"));
    }
    if local.is_empty() {
        return Err(ValidationError::InvalidEmail("missing local part"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail("domain is malformed"));
    }
    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail("domain cannot contain consecutive dots"));
    }

    Ok(())
}

/// Validate a new password's length.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "password",
            max: MAX_PASSWORD_LENGTH,
            actual: len,
        });
    }
    Ok(())
}

/// Require a non-blank value.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

/// Validate a relevance threshold.
pub fn validate_threshold(threshold: i64) -> Result<(), ValidationError> {
    let (min, max) = THRESHOLD_RANGE;
    if !(min..=max).contains(&threshold) {
        return Err(ValidationError::OutOfRange {
            field: "relevance_threshold",
            min,
            max,
        });
    }
    Ok(())
}
