//! Runtime dependency checks.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::PipelineError;

/// Environment variable that overrides ffmpeg discovery.
pub const FFMPEG_ENV: &str = "MINECAM_FFMPEG";

/// Locate the ffmpeg binary.
///
/// `MINECAM_FFMPEG` wins when set; otherwise `ffmpeg` is looked up on `PATH`.
pub fn locate_ffmpeg() -> Result<PathBuf, PipelineError> {
    if let Ok(configured) = env::var(FFMPEG_ENV) {
        let trimmed = configured.trim();
        if !trimmed.is_empty() {
            let path = PathBuf::from(trimmed);
            return if path.is_file() {
                Ok(path)
            } else {
                Err(PipelineError::FfmpegPathInvalid(path))
            };
        }
    }

    which::which("ffmpeg").map_err(|_| PipelineError::FfmpegNotFound {
        searched: env::var("PATH").unwrap_or_default(),
    })
}

/// Check that ffmpeg is available.
///
/// When `strict` is set a missing binary is an error; otherwise it is
/// logged and cameras will simply never come online.
pub fn validate_runtime_dependencies(strict: bool) -> Result<Option<PathBuf>, PipelineError> {
    match locate_ffmpeg() {
        Ok(path) => {
            info!(path = %path.display(), "ffmpeg located");
            Ok(Some(path))
        }
        Err(e) if strict => Err(e),
        Err(e) => {
            warn!(error = %e, "Runtime dependency check failed, continuing without ffmpeg");
            Ok(None)
        }
    }
}
