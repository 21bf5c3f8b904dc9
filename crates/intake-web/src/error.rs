//! Error types for the intake API.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use serde::Serialize;
use thiserror::Error;

use crate::auth;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request data.
    #[error("{0}")]
    InvalidInput(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session cookie on a protected route.
    #[error("Authentication required")]
    Unauthenticated,

    /// A session cookie that is unknown or past its expiry.
    #[error("Session expired")]
    SessionExpired,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Database failure.
    #[error("Storage error: {0}")]
    Storage(DatabaseError),

    /// Failure talking to a dependent service.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The client spent its request budget.
    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after_secs: u64 },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthenticated | ApiError::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Storage(_) | ApiError::ExternalService(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, .. } => ApiError::NotFound(entity),
            DatabaseError::DuplicateEmail => ApiError::DuplicateEmail,
            DatabaseError::InvalidCredentials => ApiError::InvalidCredentials,
            DatabaseError::Validation(e) => ApiError::InvalidInput(e.to_string()),
            DatabaseError::AlreadyExists { .. } => ApiError::InvalidInput(err.to_string()),
            other => ApiError::Storage(other),
        }
    }
}

impl From<pricing::PricingError> for ApiError {
    fn from(err: pricing::PricingError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Storage(err) => {
                tracing::error!("Storage error: {}", err);
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: Some("storage failure".to_string()),
                    redirect: None,
                }
            }
            ApiError::ExternalService(msg) => {
                tracing::error!("External service error: {}", msg);
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: Some("external service failure".to_string()),
                    redirect: None,
                }
            }
            ApiError::Unauthenticated | ApiError::SessionExpired => ErrorBody {
                error: self.to_string(),
                details: None,
                redirect: Some("/login"),
            },
            _ => ErrorBody {
                error: self.to_string(),
                details: None,
                redirect: None,
            },
        };

        if let ApiError::RateLimited { retry_after_secs } = self {
            let retry_after = retry_after_secs.to_string();
            return (status, [(header::RETRY_AFTER, retry_after)], Json(body)).into_response();
        }

        if matches!(self, ApiError::SessionExpired) {
            let clear = auth::removal_cookie().to_string();
            return (status, [(header::SET_COOKIE, clear)], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
