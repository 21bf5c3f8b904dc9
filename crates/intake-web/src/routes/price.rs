//! Price quotes.

use axum::Json;
use pricing::Pricing;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::extract::ApiJson;

#[derive(Deserialize)]
pub struct PriceRequest {
    pub frequency: Option<String>,
    pub sources_count: Option<i64>,
    pub delivery_method: Option<String>,
}

#[derive(Serialize)]
pub struct PriceResponse {
    pub success: bool,
    pub pricing: Pricing,
    pub total_formatted: String,
    pub annually_formatted: String,
}

/// Quote a monthly price. Nothing is stored.
pub async fn calculate_price(ApiJson(req): ApiJson<PriceRequest>) -> Result<Json<PriceResponse>> {
    let (Some(frequency), Some(sources_count), Some(delivery_method)) =
        (req.frequency, req.sources_count, req.delivery_method)
    else {
        return Err(ApiError::InvalidInput(
            "All pricing parameters are required".to_string(),
        ));
    };

    let pricing = pricing::calculate_price_str(&frequency, sources_count, &delivery_method)?;
    let (total_formatted, annually_formatted) = pricing.formatted();

    Ok(Json(PriceResponse {
        success: true,
        pricing,
        total_formatted,
        annually_formatted,
    }))
}
