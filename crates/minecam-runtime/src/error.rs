//! Error types for the video pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::enhance::NpyError;

/// Errors raised by the ffmpeg runtime and the enhancement pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// ffmpeg could not be located on this machine.
    #[error(
        "ffmpeg was not found. Install it or set MINECAM_FFMPEG to the binary path (searched: {searched})"
    )]
    FfmpegNotFound { searched: String },

    /// The configured ffmpeg path does not exist.
    #[error("MINECAM_FFMPEG points to a missing file: {0}")]
    FfmpegPathInvalid(PathBuf),

    /// ffmpeg could not be started.
    #[error("Failed to spawn ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    /// A LUT file could not be read.
    #[error("Failed to read LUT file {path}: {source}")]
    LutRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A LUT file was rejected.
    #[error("Invalid LUT file {path}: {source}")]
    InvalidLut {
        path: PathBuf,
        #[source]
        source: NpyError,
    },

    /// A frame buffer does not match its declared dimensions.
    #[error("Frame buffer has {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    /// JPEG encoding failed.
    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}
