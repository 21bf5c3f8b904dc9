//! AI-assisted wizard steps.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use suggest::{CompetitorPresence, SourceSuggestion, TopicSuggestion};

use crate::error::{ApiError, Result};
use crate::extract::{required, ApiJson, StringList};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TopicsRequest {
    pub business_description: Option<String>,
}

#[derive(Deserialize)]
pub struct SourcesRequest {
    pub business_description: Option<String>,
    #[serde(default)]
    pub topics: StringList,
}

#[derive(Deserialize)]
pub struct CompetitorsRequest {
    #[serde(default)]
    pub competitor_names: StringList,
}

#[derive(Serialize)]
pub struct TopicsResponse {
    pub success: bool,
    pub topics: Vec<TopicSuggestion>,
}

#[derive(Serialize)]
pub struct SourcesResponse {
    pub success: bool,
    pub sources: Vec<SourceSuggestion>,
}

#[derive(Serialize)]
pub struct CompetitorsResponse {
    pub success: bool,
    pub competitors: Vec<CompetitorPresence>,
}

/// Suggest monitoring topics for a business description.
pub async fn suggest_topics(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TopicsRequest>,
) -> Result<Json<TopicsResponse>> {
    let description = required(&req.business_description, "Business description is required")?;

    let topics = state.suggester.suggest_topics(description).await;
    Ok(Json(TopicsResponse {
        success: true,
        topics,
    }))
}

/// Suggest sources for a business description and its topics.
pub async fn suggest_sources(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SourcesRequest>,
) -> Result<Json<SourcesResponse>> {
    const MISSING: &str = "Business description and topics are required";
    let description = required(&req.business_description, MISSING)?;
    if req.topics.is_empty() {
        return Err(ApiError::InvalidInput(MISSING.to_string()));
    }

    let sources = state
        .suggester
        .suggest_sources(description, &req.topics.0)
        .await;
    Ok(Json(SourcesResponse {
        success: true,
        sources,
    }))
}

/// Look up competitor web presence.
pub async fn find_competitors(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CompetitorsRequest>,
) -> Result<Json<CompetitorsResponse>> {
    if req.competitor_names.is_empty() {
        return Err(ApiError::InvalidInput(
            "Competitor names are required".to_string(),
        ));
    }

    let competitors = state
        .suggester
        .find_competitors(&req.competitor_names.0)
        .await;
    Ok(Json(CompetitorsResponse {
        success: true,
        competitors,
    }))
}
