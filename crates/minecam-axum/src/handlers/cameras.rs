//! Camera listing and status.

use axum::Json;
use axum::extract::{Path, State};
use minecam_core::{ApiResponse, Camera, CameraStatus};

use crate::error::HttpError;
use crate::state::AppState;

/// Every configured camera annotated with its online status.
pub async fn list(State(state): State<AppState>) -> Json<ApiResponse<Vec<Camera>>> {
    let mut cameras = Vec::new();
    for camera in state.catalog.cameras_or_empty() {
        let running = state.manager.is_running(&camera.camera_id).await;
        cameras.push(camera.with_status(CameraStatus::from_running(running)));
    }
    Json(ApiResponse::ok(cameras, "Camera list retrieved"))
}

/// One camera annotated with its online status.
pub async fn status(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Json<ApiResponse<Camera>>, HttpError> {
    let camera = state
        .catalog
        .find(&camera_id)?
        .ok_or_else(|| HttpError::NotFound(format!("Camera {camera_id} is not registered")))?;

    let running = state.manager.is_running(&camera_id).await;
    Ok(Json(ApiResponse::ok(
        camera.with_status(CameraStatus::from_running(running)),
        format!("Camera {camera_id} status retrieved"),
    )))
}
