//! JSON endpoints over the shared enhancement parameters.

use axum::Json;
use axum::extract::State;
use minecam_core::{EnhanceParams, EnhanceParamsUpdate};
use serde::Serialize;

use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ParamsUpdatedBody {
    pub message: String,
    pub current_params: EnhanceParams,
}

#[derive(Debug, Serialize)]
pub struct ParamsResetBody {
    pub message: String,
    pub default_params: EnhanceParams,
}

/// Current parameters, unwrapped.
pub async fn get(State(state): State<AppState>) -> Json<EnhanceParams> {
    Json(state.manager.params().get())
}

/// Apply a partial update; absent fields keep their values.
pub async fn update(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<EnhanceParamsUpdate>,
) -> Result<Json<ParamsUpdatedBody>, HttpError> {
    let current_params = state.manager.update_enhance_params(None, &update)?;
    Ok(Json(ParamsUpdatedBody {
        message: "Enhancement parameters updated".to_string(),
        current_params,
    }))
}

pub async fn reset(State(state): State<AppState>) -> Json<ParamsResetBody> {
    let default_params = state.manager.params().reset();
    tracing::info!("Enhancement parameters reset to defaults");
    Json(ParamsResetBody {
        message: "Enhancement parameters reset to defaults".to_string(),
        default_params,
    })
}
