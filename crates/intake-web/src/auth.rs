//! Session cookies and authentication extractors.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// Build the cookie that carries a new session.
pub fn session_cookie(session_id: &str, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(cookie::time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Build a cookie that makes the client drop its session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}

/// Read the session token from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// The account behind a valid session. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub session_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let session_id =
            session_id_from_headers(&parts.headers).ok_or(ApiError::Unauthenticated)?;

        match database::session::get_session(state.db.pool(), &session_id).await? {
            Some(session) => Ok(CurrentUser {
                user_id: session.user_id,
                session_id: session.session_id,
            }),
            None => {
                debug!("Rejected unknown or expired session");
                Err(ApiError::SessionExpired)
            }
        }
    }
}

/// The account behind the request's session, if it has a valid one.
///
/// Never rejects: a missing, unknown or expired session, or a failed lookup,
/// leaves the request anonymous.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Infallible> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(ApiError::Storage(err)) => {
                warn!("Session lookup failed, continuing anonymously: {}", err);
                Ok(OptionalUser(None))
            }
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}
