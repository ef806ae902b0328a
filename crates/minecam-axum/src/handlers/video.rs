//! Video stream handlers: stream URLs, MJPEG frames, status and the
//! parameter endpoints kept for older frontends.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Response;
use futures_util::stream::Stream;
use minecam_core::{
    ApiResponse, EnhanceParams, EnhanceParamsUpdate, EnhancementStatus, StreamKind,
    VideoStreamUrl, round_fps,
};
use minecam_runtime::{StreamLogEntry, VideoStreamProcessor};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::HttpError;
use crate::extract::ApiQuery;
use crate::mjpeg;
use crate::state::AppState;

const DEFAULT_CAMERA: &str = "camera-1";
const DEFAULT_HOST: &str = "localhost:8000";

fn default_camera() -> String {
    DEFAULT_CAMERA.to_string()
}

#[derive(Debug, Deserialize)]
pub struct CameraQuery {
    #[serde(default = "default_camera")]
    pub camera_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    #[serde(default = "default_camera")]
    pub camera_id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Query of `POST /api/video/start`.
#[derive(Debug, Deserialize)]
pub struct StartQuery {
    #[serde(default = "default_camera")]
    pub camera_id: String,
    pub lut_strength: Option<f64>,
    pub gamma: Option<f64>,
    pub clahe_clip_limit: Option<f64>,
}

/// Query of `POST /api/video/update_params`. No camera means all cameras.
#[derive(Debug, Deserialize)]
pub struct UpdateParamsQuery {
    pub camera_id: Option<String>,
    pub lut_strength: Option<f64>,
    pub gamma: Option<f64>,
    pub clahe_clip_limit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct StreamControl {
    pub is_running: bool,
    pub camera_id: String,
    pub fps: f64,
}

#[derive(Debug, Serialize)]
pub struct ParamsUpdated {
    pub camera_id: String,
    pub params: EnhanceParams,
}

#[derive(Debug, Serialize)]
pub struct FpsReport {
    pub camera_id: String,
    pub fps: f64,
}

#[derive(Debug, Serialize)]
pub struct Ping {
    pub timestamp: f64,
}

/// Scheme and host the client reached us on, e.g. `http://10.0.0.5:8000`.
fn request_base_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_HOST);
    let forwarded_https = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    let scheme = if forwarded_https || uri.scheme_str() == Some("https") {
        "https"
    } else {
        "http"
    };
    format!("{scheme}://{host}")
}

async fn processor(state: &AppState, camera_id: &str) -> Result<Arc<VideoStreamProcessor>, HttpError> {
    state
        .manager
        .get_processor(camera_id)
        .await
        .ok_or_else(|| HttpError::NotFound(format!("Camera {camera_id} is not registered")))
}

/// Addresses of the raw and enhanced MJPEG streams of a camera.
pub async fn stream(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CameraQuery>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<ApiResponse<VideoStreamUrl>>, HttpError> {
    let camera_id = query.camera_id;
    if !state.catalog.rtsp_map()?.contains_key(&camera_id) {
        return Err(HttpError::NotFound(format!(
            "Camera {camera_id} is not registered"
        )));
    }
    let camera = state.catalog.find(&camera_id)?.ok_or_else(|| {
        HttpError::NotFound(format!("Camera {camera_id} configuration not found"))
    })?;

    let urls = VideoStreamUrl::build(
        &request_base_url(&headers, &uri),
        &camera_id,
        camera.display_name(),
        camera.display_location(),
    );
    Ok(Json(ApiResponse::ok(urls, "Stream URLs retrieved")))
}

/// Endless MJPEG stream of a camera's raw or enhanced frames.
pub async fn frame(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FrameQuery>,
) -> Result<Response, HttpError> {
    let kind = query
        .kind
        .as_deref()
        .map_or(StreamKind::Enhanced, StreamKind::from_query);
    let processor = processor(&state, &query.camera_id).await?;
    Ok(mjpeg::mjpeg_response(processor, kind))
}

/// Running flag, frame rate and (while running) the live parameters.
pub async fn status(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CameraQuery>,
) -> Json<ApiResponse<EnhancementStatus>> {
    let camera_id = query.camera_id;
    let is_running = state.manager.is_running(&camera_id).await;
    let fps = round_fps(state.manager.fps(&camera_id).await);
    let params = is_running.then(|| state.manager.params().get());

    Json(ApiResponse::ok(
        EnhancementStatus {
            is_running,
            camera_id,
            fps,
            params,
        },
        "Enhancement status retrieved",
    ))
}

/// Enhancement is always on; this only applies any parameters given.
pub async fn start(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StartQuery>,
) -> Result<Json<ApiResponse<StreamControl>>, HttpError> {
    let update = EnhanceParamsUpdate {
        lut_strength: query.lut_strength,
        gamma: query.gamma,
        clahe_clip_limit: query.clahe_clip_limit,
    };
    let processor = processor(&state, &query.camera_id).await?;
    if !update.is_empty() {
        state
            .manager
            .update_enhance_params(Some(&query.camera_id), &update)?;
    }

    Ok(Json(ApiResponse::ok(
        StreamControl {
            is_running: true,
            camera_id: query.camera_id,
            fps: round_fps(processor.fps()),
        },
        "Enhancement is always on; start only applies parameter updates",
    )))
}

/// Enhancement cannot be switched off; this only reports the status.
pub async fn stop(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CameraQuery>,
) -> Result<Json<ApiResponse<StreamControl>>, HttpError> {
    let processor = processor(&state, &query.camera_id).await?;
    Ok(Json(ApiResponse::ok(
        StreamControl {
            is_running: true,
            camera_id: query.camera_id,
            fps: round_fps(processor.fps()),
        },
        "Enhancement is always on; stop only reports status",
    )))
}

/// Live parameter update from query parameters.
pub async fn update_params(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UpdateParamsQuery>,
) -> Result<Json<ApiResponse<ParamsUpdated>>, HttpError> {
    let update = EnhanceParamsUpdate {
        lut_strength: query.lut_strength,
        gamma: query.gamma,
        clahe_clip_limit: query.clahe_clip_limit,
    };
    let params = if update.is_empty() {
        state.manager.params().get()
    } else {
        state
            .manager
            .update_enhance_params(query.camera_id.as_deref(), &update)?
    };

    Ok(Json(ApiResponse::ok(
        ParamsUpdated {
            camera_id: query.camera_id.unwrap_or_else(|| "all".to_string()),
            params,
        },
        "Parameters updated",
    )))
}

/// Liveness probe of the video router.
pub async fn ping() -> Json<ApiResponse<Ping>> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64());
    Json(ApiResponse::ok(Ping { timestamp }, "Video router is working!"))
}

/// Frame rate of one camera; 0 for unknown cameras.
pub async fn fps(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Json<ApiResponse<FpsReport>> {
    let fps = round_fps(state.manager.fps(&camera_id).await);
    Json(ApiResponse::ok(FpsReport { camera_id, fps }, "FPS retrieved"))
}

/// Recent decoder output of one camera.
pub async fn get_logs(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<StreamLogEntry>>>, HttpError> {
    let processor = processor(&state, &camera_id).await?;
    Ok(Json(ApiResponse::ok(
        processor.logs().entries(),
        "Decoder logs retrieved",
    )))
}

/// Drop the buffered decoder output of one camera.
pub async fn clear_logs(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Json<ApiResponse<Option<()>>>, HttpError> {
    processor(&state, &camera_id).await?.logs().clear();
    Ok(Json(ApiResponse::ok(None, "Decoder logs cleared")))
}

/// Follow decoder output of one camera via SSE.
pub async fn stream_logs(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>, HttpError> {
    let receiver = processor(&state, &camera_id).await?.logs().subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(entry) => match serde_json::to_string(&entry) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(e) => {
                tracing::warn!("Failed to serialize log entry: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::debug!("Log stream lagged: {}", e);
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    ))
}
