//! Admin statistics.

use axum::extract::State;
use axum::Json;
use database::stats::{self, DEFAULT_TOP_TOPICS};
use database::{profile, AdminStats, Profile};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: AdminStats,
    pub profiles: Vec<Profile>,
}

/// Revenue, cadence mix and topic popularity across all profiles.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let pool = state.db.pool();

    let stats = stats::admin_stats(pool, DEFAULT_TOP_TOPICS).await?;
    let profiles = profile::list_profiles(pool).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
        profiles,
    }))
}
