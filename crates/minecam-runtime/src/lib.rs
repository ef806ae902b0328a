//! Video runtime for minecam.
//!
//! Spawns one ffmpeg decoder per camera, enhances the decoded BGR frames
//! and keeps the latest original and enhanced frame of every camera ready
//! for the HTTP layer to encode and stream.
//!
//! - [`ffmpeg`] - decoder command line, dependency checks, RTSP probe, shutdown
//! - [`enhance`] - LUT, gamma, CLAHE, sharpening and defogging
//! - [`stream`] - the per-camera processor and the manager that owns them
//! - [`jpeg`] - JPEG encoding for MJPEG output

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod error;
pub mod enhance;
pub mod ffmpeg;
mod fps;
pub mod frame;
pub mod jpeg;
pub mod logs;
pub mod stream;

pub use error::PipelineError;
pub use fps::FpsMeter;
pub use frame::Frame;
pub use jpeg::{JPEG_QUALITY, encode_jpeg};
pub use logs::{StreamLogBuffer, StreamLogEntry};
pub use stream::{StreamSettings, VideoStreamManager, VideoStreamProcessor};
