//! Axum HTTP adapter for minecam.
//!
//! Serves the REST API the browser frontend talks to (login, cameras,
//! stream URLs, MJPEG frames, enhancement parameters, system settings)
//! and, optionally, the built frontend bundle with single-page fallback.
//!
//! [`bootstrap`] is the composition root: it wires the configuration
//! files, the settings repository and the video stream manager into an
//! [`AxumContext`] that every handler shares.

#![deny(unused_crate_dependencies)]

// Dev-dependency only used by the integration tests
#[cfg(test)]
use http_body_util as _;

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mjpeg;
pub mod routes;
pub mod spa;
pub mod state;

pub use auth::{ActiveUser, AdminUser, AuthError, Claims, CurrentUser, JwtConfig, hash_password};
pub use bootstrap::{AxumContext, CorsConfig, DataPaths, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use extract::{ApiForm, ApiJson, ApiQuery};
pub use routes::{create_router, create_spa_router};
pub use spa::{dist_candidates, find_dist_dir, resolve_dist_dir};
pub use state::AppState;
