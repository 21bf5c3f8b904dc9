//! Profile submission and lookup.

use axum::extract::State;
use axum::Json;
use database::{
    preference, profile, source, NewPreference, NewProfile, NewSource, Preference, Profile, Source,
};
use pricing::{DeliveryMethod, Frequency, Pricing};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{ApiError, Result};
use crate::extract::{required, ApiJson, ApiPath, StringList};
use crate::notifier::{ProfileSubmission, WebhookSource};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitProfileRequest {
    pub business_description: Option<String>,
    #[serde(default)]
    pub topics: StringList,
    pub frequency: Option<String>,
    pub delivery_method: Option<String>,
    pub approved_sources: Option<Vec<NewSource>>,
    pub preferences: Option<NewPreference>,
}

#[derive(Serialize)]
pub struct SubmitProfileResponse {
    pub success: bool,
    pub user_id: String,
    pub profile_id: String,
    pub pricing: Pricing,
    pub message: String,
    pub make_status: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: Profile,
    pub sources: Vec<Source>,
    pub preferences: Option<Preference>,
}

/// Price and store a completed wizard, then notify the automation platform.
///
/// The webhook is delivered after the response on a background task, so
/// `make_status` is always `"pending"`.
pub async fn submit_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<SubmitProfileRequest>,
) -> Result<Json<SubmitProfileResponse>> {
    const MISSING: &str = "All required fields must be provided";
    let business_description = required(&req.business_description, MISSING)?.to_string();
    let frequency = required(&req.frequency, MISSING)?;
    let delivery_method = required(&req.delivery_method, MISSING)?;
    let approved_sources = req
        .approved_sources
        .ok_or_else(|| ApiError::InvalidInput(MISSING.to_string()))?;
    if req.topics.is_empty() {
        return Err(ApiError::InvalidInput(MISSING.to_string()));
    }

    let pricing =
        pricing::calculate_price_str(frequency, approved_sources.len() as i64, delivery_method)?;
    let frequency: Frequency = frequency.parse()?;
    let delivery_method: DeliveryMethod = delivery_method.parse()?;
    let topics = req.topics.into_inner();

    let new_profile = NewProfile {
        user_id: user.user_id.clone(),
        business_description,
        topics: topics.clone(),
        frequency,
        delivery_method,
        price: pricing.total,
    };

    let profile = profile::submit_profile(
        state.db.pool(),
        &new_profile,
        &approved_sources,
        req.preferences.as_ref(),
    )
    .await?;

    info!(profile_id = %profile.id, total = pricing.total, "Profile created");

    let submission = ProfileSubmission {
        user_id: profile.user_id.clone(),
        profile_id: profile.id.clone(),
        business_description: profile.business_description.clone(),
        topics,
        frequency: frequency.to_string(),
        delivery_method: delivery_method.to_string(),
        price: profile.price,
        approved_sources: approved_sources
            .into_iter()
            .map(|s| WebhookSource {
                name: s.name,
                url: s.url,
                description: s.description,
            })
            .collect(),
        preferences: req
            .preferences
            .as_ref()
            .and_then(|p| serde_json::to_value(p).ok())
            .unwrap_or_else(|| serde_json::json!({})),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    state.notifier.spawn_delivery(state.db.clone(), submission);

    Ok(Json(SubmitProfileResponse {
        success: true,
        user_id: profile.user_id,
        profile_id: profile.id,
        pricing,
        message: "Profile created successfully".to_string(),
        make_status: "pending".to_string(),
    }))
}

/// A profile owned by the caller, with its approved sources and preferences.
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(profile_id): ApiPath<String>,
) -> Result<Json<ProfileResponse>> {
    let pool = state.db.pool();

    let profile = profile::get_profile(pool, &profile_id)
        .await?
        .filter(|p| p.user_id == user.user_id)
        .ok_or(ApiError::NotFound("Profile"))?;

    let sources = source::get_profile_sources(pool, &profile.id).await?;
    let preferences = preference::get_preferences(pool, &profile.id).await?;

    Ok(Json(ProfileResponse {
        success: true,
        profile,
        sources,
        preferences,
    }))
}
