//! Dashboard views for the logged-in account.

use axum::extract::State;
use axum::Json;
use database::{account, profile, source, update, Account, Profile, Source, UpdateFilter};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{ApiError, Result};
use crate::extract::ApiQuery;
use crate::routes::updates::UpdateListResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserUpdatesQuery {
    pub search: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "minRelevance")]
    pub min_relevance: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct SourcesResponse {
    pub success: bool,
    pub count: usize,
    pub sources: Vec<Source>,
}

#[derive(Serialize)]
pub struct ProfilesResponse {
    pub success: bool,
    pub count: usize,
    pub profiles: Vec<Profile>,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub success: bool,
    pub account: Account,
}

pub async fn updates(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<UserUpdatesQuery>,
) -> Result<Json<UpdateListResponse>> {
    let filter = UpdateFilter {
        search: query.search,
        source: query.source,
        min_relevance: query.min_relevance,
        limit: query.limit,
        ..UpdateFilter::default()
    };

    let updates = update::get_user_updates(state.db.pool(), &user.user_id, &filter).await?;

    Ok(Json(UpdateListResponse {
        success: true,
        count: updates.len(),
        updates,
    }))
}

pub async fn sources(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SourcesResponse>> {
    let sources = source::get_user_sources(state.db.pool(), &user.user_id).await?;

    Ok(Json(SourcesResponse {
        success: true,
        count: sources.len(),
        sources,
    }))
}

pub async fn profiles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProfilesResponse>> {
    let profiles = profile::get_user_profiles(state.db.pool(), &user.user_id).await?;

    Ok(Json(ProfilesResponse {
        success: true,
        count: profiles.len(),
        profiles,
    }))
}

pub async fn account(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AccountResponse>> {
    let account = account::get_account(state.db.pool(), &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Account"))?;

    Ok(Json(AccountResponse {
        success: true,
        account,
    }))
}
