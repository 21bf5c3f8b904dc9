//! Inbound update batches and per-account update listings.

use axum::extract::State;
use axum::Json;
use database::{ingest, update, IncomingUpdate, Update, UpdateFilter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Deserialize)]
struct ReceiveUpdatesRequest {
    user_id: Option<String>,
    #[serde(default)]
    profile_id: Option<String>,
    updates: Option<Vec<IncomingUpdate>>,
}

#[derive(Serialize)]
pub struct ReceiveUpdatesResponse {
    pub success: bool,
    pub message: String,
    pub updates_received: usize,
    pub updates_saved: usize,
    pub threshold: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUpdatesQuery {
    pub limit: Option<i64>,
    #[serde(rename = "minRelevance")]
    pub min_relevance: Option<f64>,
}

#[derive(Serialize)]
pub struct UpdateListResponse {
    pub success: bool,
    pub count: usize,
    pub updates: Vec<Update>,
}

#[derive(Serialize)]
pub struct DeliveredResponse {
    pub success: bool,
    pub update: Update,
}

/// Accept a batch of scored updates from the automation platform.
///
/// The raw body is kept for the audit log, so it is parsed in two steps.
pub async fn receive_updates(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<ReceiveUpdatesResponse>> {
    const MISSING: &str = "user_id and updates array are required";

    let req: ReceiveUpdatesRequest = serde_json::from_value(body.clone())
        .map_err(|e| ApiError::InvalidInput(format!("{MISSING}: {e}")))?;

    let user_id = req
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidInput(MISSING.to_string()))?;
    let updates = req
        .updates
        .ok_or_else(|| ApiError::InvalidInput(MISSING.to_string()))?;

    let summary = ingest::receive_updates(
        state.db.pool(),
        &user_id,
        req.profile_id.as_deref(),
        updates,
        &body,
    )
    .await?;

    Ok(Json(ReceiveUpdatesResponse {
        success: true,
        message: format!(
            "Received {} updates, saved {} (threshold: {})",
            summary.received, summary.saved, summary.threshold
        ),
        updates_received: summary.received,
        updates_saved: summary.saved,
        threshold: summary.threshold,
    }))
}

/// Updates stored for an account, newest first.
pub async fn list_updates(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ListUpdatesQuery>,
) -> Result<Json<UpdateListResponse>> {
    let filter = UpdateFilter {
        limit: query.limit,
        min_relevance: query.min_relevance,
        ..UpdateFilter::default()
    };

    let updates = update::get_user_updates(state.db.pool(), &user_id, &filter).await?;

    Ok(Json(UpdateListResponse {
        success: true,
        count: updates.len(),
        updates,
    }))
}

/// Flag an update as delivered. Repeating the call is harmless.
pub async fn mark_delivered(
    State(state): State<AppState>,
    ApiPath(update_id): ApiPath<i64>,
) -> Result<Json<DeliveredResponse>> {
    let pool = state.db.pool();

    update::mark_delivered(pool, update_id).await?;
    let update = update::get_update(pool, update_id)
        .await?
        .ok_or(ApiError::NotFound("Update"))?;

    Ok(Json(DeliveredResponse {
        success: true,
        update,
    }))
}
