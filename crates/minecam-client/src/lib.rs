//! REST client for the minecam API.
//!
//! [`ApiClient`] wraps the endpoints a viewer needs (login, cameras, stream
//! addresses, enhancement status, settings). [`SessionStore`] keeps the
//! token and UI preferences between runs.

#![deny(unused_crate_dependencies)]

// Dev-dependencies only used by the integration tests
#[cfg(test)]
use axum as _;
#[cfg(test)]
use bcrypt as _;
#[cfg(test)]
use minecam_axum as _;
#[cfg(test)]
use minecam_runtime as _;
#[cfg(test)]
use tokio as _;

pub mod api;
pub mod error;
pub mod session;

pub use api::{ApiClient, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult, status_message};
pub use session::{SessionStore, Theme, UiState, require_session};
