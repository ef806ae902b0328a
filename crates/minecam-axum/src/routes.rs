//! Route definitions and router construction.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use std::any::Any as PanicPayload;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::error::detail_response;
use crate::handlers;
use crate::spa::spa_routes;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Turn a handler panic into a JSON 500.
fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response<Body> {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("Unknown panic");
    tracing::error!(panic = detail, "Handler panicked");
    detail_response(StatusCode::INTERNAL_SERVER_ERROR, detail)
}

/// All API routes without the `/api` prefix (for nesting under `/api`).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth API
        .route("/token", post(handlers::auth::login))
        .route("/user/me", get(handlers::auth::me))
        .route("/logout", post(handlers::auth::logout))
        // Cameras API
        .route("/cameras", get(handlers::cameras::list))
        .route("/cameras/{camera_id}/status", get(handlers::cameras::status))
        // Video API
        .route("/video/stream", get(handlers::video::stream))
        .route("/video/frame", get(handlers::video::frame))
        .route("/video/status", get(handlers::video::status))
        .route("/video/start", post(handlers::video::start))
        .route("/video/stop", post(handlers::video::stop))
        .route("/video/update_params", post(handlers::video::update_params))
        .route("/video/test", get(handlers::video::ping))
        .route("/video/fps/{camera_id}", get(handlers::video::fps))
        .route(
            "/video/logs/{camera_id}",
            get(handlers::video::get_logs).delete(handlers::video::clear_logs),
        )
        .route(
            "/video/logs/{camera_id}/stream",
            get(handlers::video::stream_logs),
        )
        // Enhancement parameters API
        .route("/enhance_params", get(handlers::enhance::get))
        .route("/update_enhance_params", post(handlers::enhance::update))
        .route("/reset_enhance_params", post(handlers::enhance::reset))
        // Settings API
        .route("/settings/get", get(handlers::settings::get))
        .route("/settings/update", post(handlers::settings::update))
        .route("/settings/reset", post(handlers::settings::reset))
}

fn base_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state).layer(cors))
}

fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Create the main Axum router with all API routes.
///
/// For serving the frontend as well, use [`create_spa_router`].
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{camera_id}`
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    with_middleware(base_router(ctx, cors_config))
}

/// Create a router with API routes and the frontend bundle.
///
/// 1. Serves API routes under `/api/*` and `/health`
/// 2. Serves the bundle under `/static/*` and `/assets/*`
/// 3. Answers unknown `/api` paths with a JSON 404
/// 4. Falls back to bundle files, then `index.html`, for everything else
pub fn create_spa_router<P: AsRef<Path>>(
    ctx: AxumContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    with_middleware(base_router(ctx, cors_config).merge(spa_routes(static_dir.as_ref())))
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
