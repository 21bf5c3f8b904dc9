//! Database error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, constraint, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password. The two cases are not distinguished.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Password hashing or hash parsing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Input rejected before reaching storage.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether this error came from the storage engine rather than the caller.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(_) | DatabaseError::Migration(_) | DatabaseError::PasswordHash(_)
        )
    }
}

/// Returns true if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
