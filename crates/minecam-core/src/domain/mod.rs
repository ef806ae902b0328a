//! Core domain types.
//!
//! These types mirror the JSON the HTTP API exchanges with the browser
//! frontend. They carry no invariants beyond optional-field presence.
//!
//! # Structure
//!
//! - `camera` - Camera registry entries and online status
//! - `user` - User records (with and without password hash)
//! - `stream` - Stream URLs, stream kind and enhancement status
//! - `response` - The uniform `{success, data, message}` envelope

mod camera;
mod response;
mod stream;
mod user;

pub use camera::{Camera, CameraStatus};
pub use response::ApiResponse;
pub use stream::{EnhancementStatus, StreamKind, VideoStreamUrl, round_fps};
pub use user::{AccessToken, PublicUser, User, UserRecord};
