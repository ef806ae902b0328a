//! Settings handlers - the persisted system settings document.

use axum::Json;
use axum::extract::State;
use minecam_core::{ApiResponse, SystemSettings};
use serde_json::{Map, Value};

use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Get system settings (unwrapped).
pub async fn get(State(state): State<AppState>) -> Result<Json<SystemSettings>, HttpError> {
    Ok(Json(state.settings.get().await?))
}

/// Merge a partial document into the stored settings.
pub async fn update(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<ApiResponse<SystemSettings>>, HttpError> {
    let settings = state.settings.update(&patch).await?;
    Ok(Json(ApiResponse::ok(settings, "System settings updated")))
}

/// Restore and save the defaults.
pub async fn reset(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SystemSettings>>, HttpError> {
    let settings = state.settings.reset().await?;
    Ok(Json(ApiResponse::ok(settings, "System settings reset")))
}
