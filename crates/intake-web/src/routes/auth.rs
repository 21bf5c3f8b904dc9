//! Signup, login and logout.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use database::{account, session, Account, NewAccount};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::{removal_cookie, session_cookie, CurrentUser, OptionalUser};
use crate::error::{ApiError, Result};
use crate::extract::{required, ApiJson};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Open a session for `user_id` and build the response setting its cookie.
async fn start_session(
    state: &AppState,
    user_id: &str,
    message: &str,
) -> Result<impl IntoResponse> {
    let session = session::create_session(state.db.pool(), user_id, state.config.session_ttl).await?;
    let cookie = session_cookie(
        &session.session_id,
        state.config.session_ttl,
        state.config.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({
            "success": true,
            "user_id": user_id,
            "message": message,
        })),
    ))
}

/// Create an account and log it in.
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse> {
    const MISSING: &str = "All fields are required";
    let full_name = required(&req.full_name, MISSING)?;
    let company_name = required(&req.company_name, MISSING)?;
    let email = required(&req.email, MISSING)?;
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::InvalidInput(MISSING.to_string()))?;

    let account = account::create_account(
        state.db.pool(),
        &NewAccount {
            email,
            password,
            full_name,
            company_name,
        },
    )
    .await?;

    start_session(&state, &account.user_id, "Account created successfully").await
}

/// Verify credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    const MISSING: &str = "Email and password are required";
    let email = required(&req.email, MISSING)?;
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::InvalidInput(MISSING.to_string()))?;

    let account = account::verify_login(state.db.pool(), email, password).await?;

    start_session(&state, &account.user_id, "Login successful").await
}

/// Revoke the current session, if any, and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<impl IntoResponse> {
    if let Some(user) = user {
        session::delete_session(state.db.pool(), &user.session_id).await?;
        info!(user_id = %user.user_id, "Session revoked");
    }

    Ok((
        [(header::SET_COOKIE, removal_cookie().to_string())],
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    ))
}

/// The logged-in account.
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Account>> {
    let account = account::get_account(state.db.pool(), &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Account"))?;
    Ok(Json(account))
}
